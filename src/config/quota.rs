//! Container quota configuration.

use std::path::PathBuf;

use super::parse::{env_bool, env_opt, env_parse};
use super::ConfigError;
use crate::system::Rounding;

/// Default cgroup mount point.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Quota reader configuration loaded from environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotaConfig {
    /// Consult cgroup CPU quotas (HW_CONCURRENCY_QUOTA).
    pub enabled: bool,
    /// Cgroup mount root (HW_CONCURRENCY_CGROUP_ROOT).
    pub cgroup_root: PathBuf,
    /// Fractional core rounding (HW_CONCURRENCY_ROUNDING).
    pub rounding: Rounding,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cgroup_root: PathBuf::from(DEFAULT_CGROUP_ROOT),
            rounding: Rounding::default(),
        }
    }
}

impl QuotaConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let enabled = env_bool("HW_CONCURRENCY_QUOTA", true)?;
        let rounding = env_parse("HW_CONCURRENCY_ROUNDING", Rounding::default())?;

        let cgroup_root = match env_opt("HW_CONCURRENCY_CGROUP_ROOT") {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        key: "HW_CONCURRENCY_CGROUP_ROOT".into(),
                        message: format!("'{}' is not an absolute path", raw),
                    });
                }
                path
            }
            None => PathBuf::from(DEFAULT_CGROUP_ROOT),
        };

        Ok(Self {
            enabled,
            cgroup_root,
            rounding,
        })
    }

    /// Use a different cgroup mount root.
    pub fn with_cgroup_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cgroup_root = root.into();
        self
    }

    /// Use a different rounding policy.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Enable or disable quota awareness.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
