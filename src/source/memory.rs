use super::{EntitySource, Identifier, IdentifierGetter};
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Entity source over a fixed set of records held in memory.
///
/// Only identifiers that went through `prepare` resolve; anything else reads
/// as not found, which makes a missed preparation visible in tests.
#[derive(Debug)]
pub struct MemorySource {
    records: HashMap<Identifier, Value>,
    prepared: RwLock<HashSet<Identifier>>,
}

impl MemorySource {
    /// Index `records` by the identifier `getter` finds in each of them
    pub fn new(getter: IdentifierGetter, records: impl IntoIterator<Item = Value>) -> Self {
        let mut indexed = HashMap::new();
        for record in records {
            match getter.identify(&record) {
                Some(id) => {
                    indexed.insert(id, record);
                }
                None => {
                    tracing::warn!("Skipping record without identifier ({:?})", getter);
                }
            }
        }

        Self {
            records: indexed,
            prepared: RwLock::new(HashSet::new()),
        }
    }

    /// Records keyed by their `id` field
    pub fn by_id(records: impl IntoIterator<Item = Value>) -> Self {
        Self::new(IdentifierGetter::default(), records)
    }

    /// Records keyed explicitly, for entities that do not carry their own key
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<Identifier>,
    {
        Self {
            records: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            prepared: RwLock::new(HashSet::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl EntitySource for MemorySource {
    async fn prepare(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        let mut prepared = self.prepared.write().await;
        prepared.extend(ids.iter().cloned());
        Ok(())
    }

    async fn get(&self, id: &Identifier) -> Result<Option<Value>, SourceError> {
        if !self.prepared.read().await.contains(id) {
            tracing::debug!("Identifier '{}' requested without preparation", id);
            return Ok(None);
        }
        Ok(self.records.get(id).cloned())
    }

    async fn invalidate(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        let mut prepared = self.prepared.write().await;
        for id in ids {
            prepared.remove(id);
        }
        Ok(())
    }
}
