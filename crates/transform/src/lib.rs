use fluvio_jolt::{transform, TransformSpec};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to read JOLT spec file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse JOLT spec JSON: {0}")]
    SpecParse(#[from] serde_json::Error),
    #[error("Transform config must set exactly one of `spec_path` or `spec`")]
    AmbiguousSpec,
    #[error("JOLT transformation failed: {0}")]
    TransformFailed(String),
}

/// Where a transform spec comes from: a JSON file on disk or an inline value.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct TransformConfig {
    #[serde(default)]
    pub spec_path: Option<String>,
    #[serde(default)]
    pub spec: Option<Value>,
}

/// Compiled JOLT spec applied to one entity at a time.
pub struct JoltTransformEngine {
    spec: TransformSpec,
    origin: String,
}

impl JoltTransformEngine {
    /// Create a new transform engine from a config
    pub fn new(config: TransformConfig) -> Result<Self, TransformError> {
        match (config.spec_path, config.spec) {
            (Some(path), None) => Self::from_spec_path(path),
            (None, Some(spec)) => Self::from_spec_value(spec),
            _ => Err(TransformError::AmbiguousSpec),
        }
    }

    /// Load a spec from a JSON file
    pub fn from_spec_path<P: AsRef<Path>>(spec_path: P) -> Result<Self, TransformError> {
        let origin = spec_path.as_ref().to_string_lossy().to_string();
        let spec_content = std::fs::read_to_string(spec_path.as_ref())?;
        let spec: TransformSpec = serde_json::from_str(&spec_content)?;

        tracing::info!("Loaded JOLT transform spec from: {}", origin);

        Ok(Self { spec, origin })
    }

    /// Compile a spec that was given inline
    pub fn from_spec_value(spec: Value) -> Result<Self, TransformError> {
        let spec: TransformSpec = serde_json::from_value(spec)?;
        tracing::debug!("Compiled inline JOLT transform spec");
        Ok(Self {
            spec,
            origin: "<inline>".to_string(),
        })
    }

    /// Apply the JOLT transform to input JSON
    pub fn transform(&self, input: Value) -> Result<Value, TransformError> {
        transform(input, &self.spec).map_err(|e| TransformError::TransformFailed(e.to_string()))
    }

    /// File path the spec was read from, or `<inline>`
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl std::fmt::Debug for JoltTransformEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoltTransformEngine")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::NamedTempFile;

    fn rename_spec() -> Value {
        json!([{
            "operation": "shift",
            "spec": {
                "id": "id",
                "name": "display_name"
            }
        }])
    }

    #[test]
    fn test_spec_from_file_reshapes_entity() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, serde_json::to_string_pretty(&rename_spec()).unwrap()).unwrap();

        let engine = JoltTransformEngine::from_spec_path(temp_file.path()).unwrap();

        let input = json!({
            "id": "A",
            "name": "Andy",
            "password_hash": "secret"
        });

        let output = engine.transform(input).unwrap();

        assert_eq!(output, json!({"id": "A", "display_name": "Andy"}));
        assert_eq!(engine.origin(), temp_file.path().to_string_lossy());
    }

    #[test]
    fn test_inline_spec_moves_fields_under_new_parent() {
        let spec = json!([{
            "operation": "shift",
            "spec": {
                "name": "profile.name",
                "team": "profile.team"
            }
        }]);
        let engine = JoltTransformEngine::new(TransformConfig {
            spec_path: None,
            spec: Some(spec),
        })
        .unwrap();

        let output = engine
            .transform(json!({"name": "Andy", "team": "core", "id": "A"}))
            .unwrap();

        assert_eq!(output, json!({"profile": {"name": "Andy", "team": "core"}}));
        assert_eq!(engine.origin(), "<inline>");
    }

    #[test]
    fn test_config_requires_exactly_one_spec_source() {
        let neither = JoltTransformEngine::new(TransformConfig::default());
        assert!(matches!(neither, Err(TransformError::AmbiguousSpec)));

        let both = JoltTransformEngine::new(TransformConfig {
            spec_path: Some("unused.json".to_string()),
            spec: Some(rename_spec()),
        });
        assert!(matches!(both, Err(TransformError::AmbiguousSpec)));
    }

    #[test]
    fn test_missing_spec_file_is_read_error() {
        let result = JoltTransformEngine::from_spec_path("/nonexistent/spec.json");
        assert!(matches!(result, Err(TransformError::FileRead(_))));
    }

    #[test]
    fn test_malformed_spec_file_is_parse_error() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "{ not json").unwrap();

        let result = JoltTransformEngine::from_spec_path(temp_file.path());
        assert!(matches!(result, Err(TransformError::SpecParse(_))));
    }
}
