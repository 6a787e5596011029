//! Session-start summary of the current scope.

use anyhow::Result;
use projmem_core::{EntryStore, ProjectScope};
use serde_json::Value;

pub async fn execute(scope: &ProjectScope, store: &mut EntryStore) -> Result<Value> {
    let result = store.summary(scope).await?;
    Ok(serde_json::to_value(result)?)
}
