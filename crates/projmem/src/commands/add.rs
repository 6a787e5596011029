//! Store a new entry in the current scope.

use anyhow::Result;
use projmem_core::types::NewEntry;
use projmem_core::{EntryStore, ProjectScope};
use serde_json::Value;

use crate::cli::AddArgs;

pub async fn execute(
    args: AddArgs,
    scope: &ProjectScope,
    store: &mut EntryStore,
) -> Result<Value> {
    let entry = NewEntry {
        entry_type: args.entry_type.as_str().to_string(),
        title: args.title,
        content: args.content,
        tags: args.tags,
        priority: args.priority.as_str().to_string(),
        related_files: args.files,
        created_by: args.by,
    };

    let result = store.add(scope, &entry).await?;
    Ok(serde_json::to_value(result)?)
}
