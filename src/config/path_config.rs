use crate::error::ConfigError;
use crate::options::{PathOption, ToKey, Transform};
use crate::path::PathPattern;
use entity_transform::{JoltTransformEngine, TransformConfig};
use serde::Deserialize;

/// Declarative form of a [`PathOption`], as written in a settings file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PathOptionConfig {
    pub source: String,
    #[serde(default)]
    pub remove_id_key: bool,
    #[serde(default)]
    pub to: Option<ToKey>,
    #[serde(default)]
    pub transform: Option<TransformConfig>,
}

impl PathOptionConfig {
    /// Validate `pattern` and compile any transform spec
    pub fn build(&self, pattern: &str) -> Result<PathOption, ConfigError> {
        PathPattern::parse(pattern).map_err(|err| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: match err {
                crate::error::AggregateError::InvalidPattern { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;

        let transform = match &self.transform {
            Some(config) => {
                let engine = JoltTransformEngine::new(config.clone()).map_err(|error| {
                    ConfigError::Transform {
                        pattern: pattern.to_string(),
                        error,
                    }
                })?;
                Some(Transform::jolt(engine))
            }
            None => None,
        };

        Ok(PathOption {
            source: self.source.clone(),
            remove_id_key: self.remove_id_key,
            transform,
            to: self.to.clone(),
        })
    }
}
