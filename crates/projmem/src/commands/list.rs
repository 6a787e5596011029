//! List entries with filters, plus the todo/decision/context shorthands.

use anyhow::Result;
use projmem_core::types::ListFilter;
use projmem_core::{EntryStore, ProjectScope};
use serde_json::Value;

use crate::cli::ListArgs;

pub async fn execute(
    args: ListArgs,
    scope: &ProjectScope,
    store: &mut EntryStore,
) -> Result<Value> {
    let filter = ListFilter {
        entry_type: args.entry_type,
        tag: args.tag,
        status: args.status,
        limit: args.limit,
        cross_branch: args.all_branches,
    };

    let result = store.list(scope, &filter).await?;
    Ok(serde_json::to_value(result)?)
}

pub async fn todos(scope: &ProjectScope, store: &mut EntryStore) -> Result<Value> {
    let result = store.todos(scope).await?;
    Ok(serde_json::to_value(result)?)
}

pub async fn decisions(scope: &ProjectScope, store: &mut EntryStore) -> Result<Value> {
    let result = store.decisions(scope).await?;
    Ok(serde_json::to_value(result)?)
}

pub async fn context(scope: &ProjectScope, store: &mut EntryStore) -> Result<Value> {
    let result = store.context(scope).await?;
    Ok(serde_json::to_value(result)?)
}
