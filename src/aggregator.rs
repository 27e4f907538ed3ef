//! The aggregator: registered sources plus the resolve → plan → prepare →
//! inject pipeline.

use crate::error::{AggregateError, Result};
use crate::inject::inject_all;
use crate::options::AggregationConfig;
use crate::plan::plan;
use crate::prepare::prepare_all;
use crate::source::{EntitySource, SourceRegistry};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Resolves identifier fields in data trees against named entity sources.
///
/// Sources are registered once up front; the aggregator holds no other
/// state, so one instance can serve concurrent calls.
#[derive(Clone, Default)]
pub struct Aggregator {
    sources: SourceRegistry,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `name`; a later registration of the same name wins
    pub fn register(self, name: impl Into<String>, source: impl EntitySource + 'static) -> Self {
        self.register_shared(name, Arc::new(source))
    }

    /// Register a source that is shared with other owners
    pub fn register_shared(mut self, name: impl Into<String>, source: Arc<dyn EntitySource>) -> Self {
        let name = name.into();
        if self.sources.insert(name.clone(), source).is_some() {
            tracing::debug!("Replaced entity source '{}'", name);
        }
        self
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Resolve every configured identifier in `data` and return the enriched tree.
    ///
    /// `null` is returned unchanged. The tree is modified in place; no copy is made.
    pub async fn aggregate(&self, mut data: Value, config: &AggregationConfig) -> Result<Value> {
        self.aggregate_in_place(&mut data, config).await?;
        Ok(data)
    }

    /// Same as [`Aggregator::aggregate`] for a tree the caller keeps owning.
    ///
    /// Injection is not transactional: if a source's `get` or a transform
    /// fails part way through, entries applied before the failure stay in
    /// `data` and the rest are not applied.
    #[tracing::instrument(skip_all, fields(paths = config.len()))]
    pub async fn aggregate_in_place(
        &self,
        data: &mut Value,
        config: &AggregationConfig,
    ) -> Result<()> {
        if data.is_null() || config.is_empty() {
            return Ok(());
        }

        if let Some(missing) = config.sources().find(|name| !self.sources.contains_key(*name)) {
            return Err(AggregateError::unknown_source(missing));
        }

        let plan = plan(data, config)?;
        tracing::debug!(
            "Planned {} injection(s) across {} source(s)",
            plan.entry_count(),
            plan.ids_by_source.len()
        );

        prepare_all(&self.sources, &plan.ids_by_source).await?;
        inject_all(data, plan.entries, &self.sources).await?;

        tracing::debug!("Aggregation completed");
        Ok(())
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.source_names().collect();
        names.sort_unstable();
        f.debug_struct("Aggregator").field("sources", &names).finish()
    }
}
