//! Logging configuration.

use super::parse::env_or;
use super::ConfigError;

/// Output format for the optional subscriber installed by [`crate::logging::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Output format (from LOG_FORMAT).
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hw_concurrency=info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: hw_concurrency=debug,my_pool=warn
    pub fn from_env() -> Result<Self, ConfigError> {
        let filter = Self::resolve_log_filter();
        let raw = env_or("LOG_FORMAT", "text");
        let format = match raw.to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT".into(),
                    message: format!("'{}', expected: text, json", raw),
                })
            }
        };

        Ok(Self { filter, format })
    }

    /// Resolve log filter from environment.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default (info)
    fn resolve_log_filter() -> String {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            let level = level.to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    return format!("hw_concurrency={}", level);
                }
                _ => {
                    // Invalid level, fall through to RUST_LOG
                    eprintln!(
                        "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                        level
                    );
                }
            }
        }

        if let Ok(filter) = std::env::var("RUST_LOG") {
            return filter;
        }

        Self::default().filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_log_level_priority() {
        env::remove_var("LOG_LEVEL");
        env::remove_var("RUST_LOG");

        // Default
        assert_eq!(LoggingConfig::resolve_log_filter(), "hw_concurrency=info");

        // RUST_LOG
        env::set_var("RUST_LOG", "hw_concurrency=warn,my_pool=debug");
        assert_eq!(
            LoggingConfig::resolve_log_filter(),
            "hw_concurrency=warn,my_pool=debug"
        );

        // LOG_LEVEL takes priority over RUST_LOG
        env::set_var("LOG_LEVEL", "debug");
        assert_eq!(LoggingConfig::resolve_log_filter(), "hw_concurrency=debug");

        // Unknown LOG_LEVEL falls through
        env::set_var("LOG_LEVEL", "loud");
        assert_eq!(
            LoggingConfig::resolve_log_filter(),
            "hw_concurrency=warn,my_pool=debug"
        );

        env::remove_var("LOG_LEVEL");
        env::remove_var("RUST_LOG");
    }

    #[test]
    fn test_log_format() {
        env::set_var("LOG_FORMAT", "JSON");
        assert_eq!(LoggingConfig::from_env().unwrap().format, LogFormat::Json);

        env::set_var("LOG_FORMAT", "xml");
        assert!(matches!(
            LoggingConfig::from_env(),
            Err(ConfigError::Invalid { .. })
        ));

        env::remove_var("LOG_FORMAT");
        assert_eq!(LoggingConfig::from_env().unwrap().format, LogFormat::Text);
    }
}
