//! Configuration error types.

use std::fmt;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse environment variable.
    Parse {
        key: String,
        value: String,
        error: String,
    },
    /// Invalid value for environment variable.
    Invalid { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { key, value, error } => {
                write!(f, "failed to parse {}='{}': {}", key, value, error)
            }
            ConfigError::Invalid { key, message } => {
                write!(f, "invalid value for {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigError::Parse {
            key: "HW_CONCURRENCY_ROUNDING".into(),
            value: "sideways".into(),
            error: "unknown rounding policy".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse HW_CONCURRENCY_ROUNDING='sideways': unknown rounding policy"
        );

        let err = ConfigError::Invalid {
            key: "HW_CONCURRENCY_CGROUP_ROOT".into(),
            message: "path must be absolute".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for HW_CONCURRENCY_CGROUP_ROOT: path must be absolute"
        );
    }
}
