//! Preparation coordinator: one concurrent `prepare` batch per source.

use crate::error::{AggregateError, Result};
use crate::source::{Identifier, SourceRegistry};
use futures_util::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Prepare every source that has identifiers to resolve.
///
/// All `prepare` calls run concurrently; the first failure is returned and
/// the remaining calls are dropped. Sources with no identifiers are skipped.
pub async fn prepare_all(
    sources: &SourceRegistry,
    ids_by_source: &IndexMap<String, IndexSet<Identifier>>,
) -> Result<()> {
    let mut pending = Vec::with_capacity(ids_by_source.len());

    for (name, ids) in ids_by_source {
        if ids.is_empty() {
            continue;
        }
        let source = sources
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| AggregateError::unknown_source(name.as_str()))?;
        let ids: Vec<Identifier> = ids.iter().cloned().collect();
        let source_name = name.clone();

        pending.push(async move {
            tracing::debug!("Preparing {} identifier(s) from '{}'", ids.len(), source_name);
            source
                .prepare(&ids)
                .await
                .map_err(|error| AggregateError::Prepare { source_name, error })
        });
    }

    if pending.is_empty() {
        return Ok(());
    }

    let prepared = pending.len();
    try_join_all(pending).await?;
    tracing::debug!("Prepared {} source(s)", prepared);
    Ok(())
}
