//! Error types for aggregation

use thiserror::Error;

/// Result type alias for aggregation operations
pub type Result<T> = std::result::Result<T, AggregateError>;

/// Boxed error an entity source can wrap
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by entity sources during `prepare`, `get` or `invalidate`
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] BoxError),
}

impl SourceError {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Error types that can occur while aggregating a data tree
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No entity source registered under '{name}'")]
    UnknownSource { name: String },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Source '{source_name}' failed to prepare: {error}")]
    Prepare {
        source_name: String,
        #[source]
        error: SourceError,
    },

    #[error("Source '{source_name}' failed to resolve '{identifier}': {error}")]
    Fetch {
        source_name: String,
        identifier: String,
        #[source]
        error: SourceError,
    },

    #[error("Transform failed for entity injected at '{path}': {error}")]
    Transform {
        path: String,
        #[source]
        error: entity_transform::TransformError,
    },
}

impl AggregateError {
    /// Create a new unknown source error
    pub fn unknown_source(name: impl Into<String>) -> Self {
        Self::UnknownSource { name: name.into() }
    }

    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Errors caused by the aggregation configuration rather than the data or a source
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AggregateError::UnknownSource { .. } | AggregateError::InvalidPattern { .. }
        )
    }
}

/// Errors raised while loading settings from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to load transform for '{pattern}': {error}")]
    Transform {
        pattern: String,
        #[source]
        error: entity_transform::TransformError,
    },

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("Logging already initialised: {0}")]
    LoggingInit(String),
}
