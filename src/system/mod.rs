//! Platform sensing: container quotas, native processor counts and capability flags.
//!
//! Provides cgroup-aware CPU detection for Kubernetes and Docker environments.
//!
//! # Cgroup Support
//!
//! - **cgroup v2**: Modern unified hierarchy (`cpu.max`), tried first
//! - **cgroup v1**: Legacy hierarchy (`cpu.cfs_quota_us` / `cpu.cfs_period_us`)
//!
//! # Example
//!
//! ```rust,ignore
//! use hw_concurrency::system::{QuotaReader, Rounding};
//!
//! let reading = QuotaReader::new("/sys/fs/cgroup", Rounding::HalfUp).read();
//! println!("CPU quota: {:?} via cgroup {}", reading.limit.get(), reading.version);
//! ```

mod cgroup;
mod flags;
mod probe;

pub use cgroup::{
    parse_cpu_max, CgroupVersion, QuotaError, QuotaLimit, QuotaReader, QuotaReading, Rounding,
    ABSENT,
};
pub use flags::{signals_slow_for_api_level, thread_signal_is_slow, SLOW_SIGNALS_API_CUTOFF};
pub use probe::{configured_processors, online_processors, ProcessorCounts, TIER as PROBE_TIER};
