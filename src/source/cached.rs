use super::{EntitySource, Identifier, IdentifierGetter};
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Batch lookup behind a [`CachedSource`]
#[async_trait]
pub trait Loader: Send + Sync {
    /// Fetch the entities for `ids`; unknown identifiers are simply left out
    async fn load(&self, ids: &[Identifier]) -> Result<Vec<Value>, SourceError>;
}

/// Entity source that remembers what its loader returned.
///
/// `prepare` only loads identifiers that are not cached yet. Identifiers the
/// loader did not return are remembered as missing until invalidated.
pub struct CachedSource<L> {
    loader: L,
    getter: IdentifierGetter,
    cache: RwLock<HashMap<Identifier, Option<Value>>>,
}

impl<L: Loader> CachedSource<L> {
    pub fn new(loader: L, getter: IdentifierGetter) -> Self {
        Self {
            loader,
            getter,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached entries, found or missing
    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

#[async_trait]
impl<L: Loader> EntitySource for CachedSource<L> {
    async fn prepare(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        let missing: Vec<Identifier> = {
            let cache = self.cache.read().await;
            ids.iter()
                .filter(|id| !cache.contains_key(*id))
                .cloned()
                .collect()
        };

        if missing.is_empty() {
            tracing::trace!("All {} identifier(s) already cached", ids.len());
            return Ok(());
        }

        tracing::debug!("Loading {} uncached identifier(s)", missing.len());
        let loaded = self.loader.load(&missing).await?;

        let mut cache = self.cache.write().await;
        for record in loaded {
            match self.getter.identify(&record) {
                Some(id) => {
                    cache.insert(id, Some(record));
                }
                None => tracing::warn!("Loader returned a record without identifier"),
            }
        }
        for id in missing {
            cache.entry(id).or_insert(None);
        }
        Ok(())
    }

    async fn get(&self, id: &Identifier) -> Result<Option<Value>, SourceError> {
        Ok(self.cache.read().await.get(id).cloned().flatten())
    }

    async fn invalidate(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        let mut cache = self.cache.write().await;
        for id in ids {
            cache.remove(id);
        }
        tracing::debug!("Invalidated {} identifier(s)", ids.len());
        Ok(())
    }
}
