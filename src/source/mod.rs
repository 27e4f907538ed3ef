//! Entity sources: the pluggable capability the aggregator fetches from.

use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod cached;
pub mod memory;


pub use cached::{CachedSource, Loader};
pub use memory::MemorySource;

/// Sources keyed by the name configurations refer to them by
pub type SourceRegistry = HashMap<String, Arc<dyn EntitySource>>;

/// Key into an entity source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an identifier out of a scalar JSON value.
    ///
    /// Strings are used as-is, numbers and booleans by their JSON text.
    /// Null and containers yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(b) => Some(Self(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How a source finds the identifier of one of its entities
#[derive(Clone)]
pub enum IdentifierGetter {
    /// Read a top-level field of the entity
    Field(String),
    /// Compute the identifier from the entity
    Extractor(Arc<dyn Fn(&Value) -> Option<Identifier> + Send + Sync>),
}

impl IdentifierGetter {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn extractor<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Identifier> + Send + Sync + 'static,
    {
        Self::Extractor(Arc::new(f))
    }

    pub fn identify(&self, entity: &Value) -> Option<Identifier> {
        match self {
            IdentifierGetter::Field(name) => entity.get(name).and_then(Identifier::from_value),
            IdentifierGetter::Extractor(extract) => extract(entity),
        }
    }
}

impl Default for IdentifierGetter {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl fmt::Debug for IdentifierGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierGetter::Field(name) => f.debug_tuple("Field").field(name).finish(),
            IdentifierGetter::Extractor(_) => f.write_str("Extractor(..)"),
        }
    }
}

/// Batch-prepares and then resolves entities by identifier.
///
/// The aggregator calls `prepare` once per aggregation with every identifier
/// it will later pass to `get`, and only starts calling `get` after every
/// source's `prepare` has completed.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Make every listed identifier resolvable by subsequent `get` calls
    async fn prepare(&self, ids: &[Identifier]) -> Result<(), SourceError>;

    /// Return the prepared entity, or `None` if it does not exist
    async fn get(&self, id: &Identifier) -> Result<Option<Value>, SourceError>;

    /// Drop any cached state for the listed identifiers
    async fn invalidate(&self, _ids: &[Identifier]) -> Result<(), SourceError> {
        Ok(())
    }
}

#[async_trait]
impl<S> EntitySource for Arc<S>
where
    S: EntitySource + ?Sized,
{
    async fn prepare(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        (**self).prepare(ids).await
    }

    async fn get(&self, id: &Identifier) -> Result<Option<Value>, SourceError> {
        (**self).get(id).await
    }

    async fn invalidate(&self, ids: &[Identifier]) -> Result<(), SourceError> {
        (**self).invalidate(ids).await
    }
}
