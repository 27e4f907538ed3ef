//! Aggregation configuration: which identifier fields to resolve and how.

use entity_transform::{JoltTransformEngine, TransformError};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Reshapes a resolved entity before it is injected
#[derive(Clone)]
pub enum Transform {
    Function(Arc<dyn Fn(Value) -> Value + Send + Sync>),
    Jolt(Arc<JoltTransformEngine>),
}

impl Transform {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    pub fn jolt(engine: JoltTransformEngine) -> Self {
        Self::Jolt(Arc::new(engine))
    }

    pub fn apply(&self, entity: Value) -> Result<Value, TransformError> {
        match self {
            Transform::Function(f) => Ok(f(entity)),
            Transform::Jolt(engine) => engine.transform(entity),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Function(_) => f.write_str("Function(..)"),
            Transform::Jolt(engine) => f.debug_tuple("Jolt").field(&engine.origin()).finish(),
        }
    }
}

/// Write the entity under a new sibling field instead of merging it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToKey {
    pub key: String,
    #[serde(default)]
    pub omit_null: bool,
}

/// How a resolved entity is written back into the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionMode {
    /// Merge the entity's fields into the object holding the identifier
    Merge,
    /// Set `key` on the object holding the identifier
    ToKey { key: String, omit_null: bool },
}

/// Options for one path pattern
#[derive(Debug, Clone)]
pub struct PathOption {
    pub source: String,
    pub remove_id_key: bool,
    pub transform: Option<Transform>,
    /// Present selects TO_KEY injection; absent selects MERGE
    pub to: Option<ToKey>,
}

impl PathOption {
    /// Merge entities from `source` into the identifier's parent object
    pub fn merge(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            remove_id_key: false,
            transform: None,
            to: None,
        }
    }

    /// Write entities from `source` under `key`, next to the identifier
    pub fn to_key(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            to: Some(ToKey {
                key: key.into(),
                omit_null: false,
            }),
            ..Self::merge(source)
        }
    }

    /// Delete the identifier field once the entity has been injected
    pub fn remove_id_key(mut self) -> Self {
        self.remove_id_key = true;
        self
    }

    /// Leave the target key out entirely when the entity is null.
    /// Has no effect in merge mode.
    pub fn omit_null(mut self) -> Self {
        if let Some(to) = self.to.as_mut() {
            to.omit_null = true;
        }
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Transform::function(f));
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn mode(&self) -> InjectionMode {
        match &self.to {
            Some(to) => InjectionMode::ToKey {
                key: to.key.clone(),
                omit_null: to.omit_null,
            },
            None => InjectionMode::Merge,
        }
    }
}

/// Path pattern → option, in the order the patterns were added.
///
/// Adding a pattern that is already present replaces its option in place.
#[derive(Debug, Clone, Default)]
pub struct AggregationConfig {
    paths: IndexMap<String, PathOption>,
}

impl AggregationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, pattern: impl Into<String>, option: PathOption) -> Self {
        self.insert(pattern, option);
        self
    }

    pub fn insert(&mut self, pattern: impl Into<String>, option: PathOption) {
        self.paths.insert(pattern.into(), option);
    }

    pub fn get(&self, pattern: &str) -> Option<&PathOption> {
        self.paths.get(pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathOption)> {
        self.paths.iter().map(|(pattern, option)| (pattern.as_str(), option))
    }

    /// Distinct source names referenced by any pattern
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        let mut seen = Vec::new();
        for option in self.paths.values() {
            if !seen.contains(&option.source.as_str()) {
                seen.push(option.source.as_str());
            }
        }
        seen.into_iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<(String, PathOption)> for AggregationConfig {
    fn from_iter<I: IntoIterator<Item = (String, PathOption)>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
