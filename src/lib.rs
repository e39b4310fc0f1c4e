//! hw_concurrency - Container-aware hardware concurrency sensor.
//!
//! Answers the two questions a thread pool asks about the machine it runs on:
//!
//! - [`max_concurrency`]: how many execution units to design the pool around
//!   (computed once, stable for the process lifetime)
//! - [`current_concurrency`]: how many execution units are usable right now
//!   (re-queried on every call)
//!
//! plus [`thread_signal_is_slow`], a hint for thread lifecycle code on old
//! Android releases.
//!
//! # Container Quotas
//!
//! On Linux, a CPU quota set through cgroup v2 (`cpu.max`) or cgroup v1
//! (`cpu.cfs_quota_us` / `cpu.cfs_period_us`) takes precedence over the
//! processor count. Fractional quotas round half up: 1.5 CPUs becomes 2.
//! Missing, unreadable or malformed quota files silently fall back to the
//! OS processor counts; every query returns at least 1.
//!
//! # Features
//!
//! - `cgroup-limits` (default): consult container quotas on Linux
//! - `single-thread`: pin both values to 1 without probing
//!
//! # Example
//!
//! ```rust,ignore
//! use hw_concurrency::config::SensorConfig;
//!
//! let config = SensorConfig::from_env()?;
//! hw_concurrency::logging::init(&config.logging)?;
//! config.log_summary();
//! hw_concurrency::init(&config).log_summary();
//!
//! let pool = ThreadPool::new(hw_concurrency::max_concurrency());
//!
//! // Code that takes a `&Sensor` can be handed the process-wide one.
//! let sensor: &'static hw_concurrency::Sensor = hw_concurrency::resolver::global();
//! let report = sensor.report();
//! ```

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod logging;
pub mod resolver;
pub mod system;

// Re-exports for convenience
pub use config::SensorConfig;
pub use resolver::{
    current_concurrency, init, max_concurrency, report, ConcurrencyReport, Sensor,
};
pub use system::thread_signal_is_slow;
