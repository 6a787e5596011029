//! Full-text search over the current scope.

use anyhow::Result;
use projmem_core::types::SearchOptions;
use projmem_core::{EntryStore, ProjectScope};
use serde_json::Value;

pub async fn execute(
    query: &str,
    limit: i64,
    all_branches: bool,
    scope: &ProjectScope,
    store: &mut EntryStore,
) -> Result<Value> {
    let opts = SearchOptions {
        limit,
        cross_branch: all_branches,
    };

    let result = store.search(scope, query, &opts).await?;
    Ok(serde_json::to_value(result)?)
}
