//! tracing-subscriber setup for binaries and tests embedding the aggregator.

use crate::config::LoggingConfig;
use crate::error::ConfigError;
use std::sync::Arc;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a global subscriber writing to stdout and, optionally, a file.
///
/// `config.log_level` must be one of `off`, `error`, `warn`, `info`, `debug`
/// or `trace`; `RUST_LOG` takes precedence over it. Calling this twice
/// returns [`ConfigError::LoggingInit`].
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    let level: LevelFilter = config
        .log_level
        .parse()
        .map_err(|_| ConfigError::InvalidLogLevel(config.log_level.clone()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let stdout_layer = fmt::layer().with_file(true).with_line_number(true);

    let file_layer = if config.log_to_file {
        let file = std::fs::File::create(&config.log_file_path).map_err(|error| ConfigError::Io {
            path: config.log_file_path.clone(),
            error,
        })?;
        Some(
            fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::LoggingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let config = LoggingConfig::default();
        let _ = init(&config);

        assert!(matches!(init(&config), Err(ConfigError::LoggingInit(_))));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let config = LoggingConfig {
            log_level: "verbose".to_string(),
            ..LoggingConfig::default()
        };

        match init(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "verbose"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unwritable_log_file_is_io_error() {
        let config = LoggingConfig {
            log_to_file: true,
            log_file_path: "/nonexistent/dir/aggregator.log".to_string(),
            ..LoggingConfig::default()
        };

        assert!(matches!(init(&config), Err(ConfigError::Io { .. })));
    }
}
