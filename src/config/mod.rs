//! Configuration module for hw_concurrency.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use hw_concurrency::config::SensorConfig;
//!
//! let config = SensorConfig::from_env()?;
//! config.log_summary();
//! let report = hw_concurrency::init(&config);
//! println!("Pool ceiling: {}", report.max);
//! ```

mod error;
mod logging;
mod parse;
mod quota;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use quota::{QuotaConfig, DEFAULT_CGROUP_ROOT};

/// Complete sensor configuration.
#[derive(Clone, Debug, Default)]
pub struct SensorConfig {
    /// Quota reader configuration.
    pub quota: QuotaConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl SensorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            quota: QuotaConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        if self.quota.enabled {
            info!("  Cgroup root: {:?}", self.quota.cgroup_root);
            info!("  Quota rounding: {}", self.quota.rounding);
        } else {
            info!("  Container quota: disabled");
        }
        info!("  Log filter: {}", self.logging.filter);
    }
}
