//! Settings loaded from a TOML or JSON file.
//!
//! ```toml
//! [logging]
//! log_level = "debug"
//!
//! [aggregate."tasks.*.assigneeId"]
//! source = "user"
//! remove_id_key = true
//! to = { key = "assignee", omit_null = true }
//! ```

mod logging_config;
mod path_config;

#[cfg(test)]
mod tests;

pub use logging_config::LoggingConfig;
pub use path_config::PathOptionConfig;

use crate::error::ConfigError;
use crate::options::AggregationConfig;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path pattern → option, in file order
    #[serde(default)]
    pub aggregate: IndexMap<String, PathOptionConfig>,
}

impl Settings {
    /// Load settings from `path`; `.json` files are read as JSON, anything else as TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let settings = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::info!(
            "Loaded {} aggregation path(s) from {}",
            settings.aggregate.len(),
            path.display()
        );
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the aggregation configuration, validating every pattern and
    /// compiling every transform spec
    pub fn aggregation_config(&self) -> Result<AggregationConfig, ConfigError> {
        self.aggregate
            .iter()
            .map(|(pattern, option)| Ok((pattern.clone(), option.build(pattern)?)))
            .collect()
    }
}
