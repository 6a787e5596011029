//! Update fields of an existing entry by id.

use anyhow::Result;
use projmem_core::EntryStore;
use projmem_core::types::EntryPatch;
use serde_json::Value;

use crate::cli::UpdateArgs;

pub async fn execute(args: UpdateArgs, store: &mut EntryStore) -> Result<Value> {
    let patch = EntryPatch {
        status: args.status,
        title: args.title,
        content: args.content,
    };

    let result = store.update(args.id, &patch).await?;
    Ok(serde_json::to_value(result)?)
}
