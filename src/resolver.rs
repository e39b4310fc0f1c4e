//! Concurrency resolution and process-wide cached state.
//!
//! A [`Sensor`] combines the container quota with native processor counts:
//!
//! - `max = quota if present, else configured processors` (computed once)
//! - `current = quota if present, else online processors` (re-probed per call)
//!
//! The quota and the max value are compute-once: the first caller probes,
//! concurrent first callers block until that probe is published, and every
//! later call reads the cached value. Rust runs no code before `main`, so a
//! global thread pool built lazily can never observe a half-initialized
//! sensor. Hosts that want the probe done at a known point call [`init`]
//! during startup.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{QuotaConfig, SensorConfig};
use crate::system::{self, ProcessorCounts, QuotaReader, QuotaReading, PROBE_TIER};

/// Whether this build consults container CPU quotas.
pub const QUOTA_AWARE: bool = cfg!(all(
    feature = "cgroup-limits",
    target_os = "linux",
    not(feature = "single-thread")
));

/// Whether this build pins all concurrency values to 1.
pub const SINGLE_THREAD: bool = cfg!(feature = "single-thread");

/// Compute-once concurrency state.
#[derive(Debug)]
pub struct Sensor {
    config: OnceLock<QuotaConfig>,
    quota: OnceLock<QuotaReading>,
    max: OnceLock<NonZeroUsize>,
}

impl Default for Sensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor {
    /// Unconfigured sensor. Configuration is read from the environment on first use.
    pub const fn new() -> Self {
        Self {
            config: OnceLock::new(),
            quota: OnceLock::new(),
            max: OnceLock::new(),
        }
    }

    pub fn with_config(config: QuotaConfig) -> Self {
        let sensor = Self::new();
        sensor.configure(config);
        sensor
    }

    /// Install configuration. Returns `false` if the sensor was already configured,
    /// in which case the first configuration stays in effect.
    pub fn configure(&self, config: QuotaConfig) -> bool {
        match self.config.set(config) {
            Ok(()) => true,
            Err(_) => {
                debug!("Sensor already configured, keeping first configuration");
                false
            }
        }
    }

    pub fn config(&self) -> &QuotaConfig {
        self.config.get_or_init(|| {
            QuotaConfig::from_env().unwrap_or_else(|e| {
                warn!("Invalid quota configuration, using defaults: {}", e);
                QuotaConfig::default()
            })
        })
    }

    /// Container quota, probed once.
    pub fn quota(&self) -> &QuotaReading {
        self.quota.get_or_init(|| {
            let config = self.config();
            if QUOTA_AWARE && config.enabled {
                QuotaReader::from_config(config).read()
            } else {
                debug!("Container quota not consulted");
                QuotaReading::none()
            }
        })
    }

    /// Sizing ceiling. Stable for the lifetime of the sensor.
    pub fn max_concurrency(&self) -> NonZeroUsize {
        if SINGLE_THREAD {
            return NonZeroUsize::MIN;
        }
        *self.max.get_or_init(|| {
            self.quota()
                .limit
                .get()
                .unwrap_or_else(system::configured_processors)
        })
    }

    /// Usable execution units right now. May differ between calls.
    pub fn current_concurrency(&self) -> NonZeroUsize {
        if SINGLE_THREAD {
            return NonZeroUsize::MIN;
        }
        self.quota()
            .limit
            .get()
            .unwrap_or_else(system::online_processors)
    }

    /// Snapshot of everything the sensor knows.
    pub fn report(&self) -> ConcurrencyReport {
        ConcurrencyReport {
            max: self.max_concurrency().get(),
            current: self.current_concurrency().get(),
            quota_aware: QUOTA_AWARE && self.config().enabled,
            single_thread: SINGLE_THREAD,
            quota: self.quota().clone(),
            processors: if SINGLE_THREAD {
                ProcessorCounts::single()
            } else {
                ProcessorCounts::probe()
            },
            probe: PROBE_TIER,
            thread_signal_is_slow: system::thread_signal_is_slow(),
        }
    }
}

/// Point-in-time view of the resolved values and their inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ConcurrencyReport {
    pub max: usize,
    pub current: usize,
    pub quota_aware: bool,
    pub single_thread: bool,
    pub quota: QuotaReading,
    pub processors: ProcessorCounts,
    /// Native probe tier compiled into this build.
    pub probe: &'static str,
    pub thread_signal_is_slow: bool,
}

impl ConcurrencyReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Print report summary to log.
    pub fn log_summary(&self) {
        info!("Hardware concurrency:");
        info!("  Max: {}", self.max);
        info!("  Current: {}", self.current);
        match self.quota.limit.get() {
            Some(cores) => info!(
                "  Container quota: {} cores (cgroup {}, {}/{} us)",
                cores, self.quota.version, self.quota.quota_us, self.quota.period_us
            ),
            None if self.quota_aware => info!("  Container quota: none"),
            None => info!("  Container quota: not consulted"),
        }
        info!(
            "  Processors: {} configured, {} online ({})",
            self.processors.configured, self.processors.online, self.probe
        );
        if self.thread_signal_is_slow {
            info!("  Thread signals: slow");
        }
    }
}

static SENSOR: Sensor = Sensor::new();

/// The process-wide sensor behind the free functions.
pub fn global() -> &'static Sensor {
    &SENSOR
}

/// Explicit startup phase: configure the global sensor and probe it now.
///
/// Call before constructing anything that sizes itself from [`max_concurrency`].
/// If the sensor was already used or initialized, the earlier configuration wins.
pub fn init(config: &SensorConfig) -> ConcurrencyReport {
    SENSOR.configure(config.quota.clone());
    let report = SENSOR.report();
    debug!("Sensor initialized: {}", report.to_json());
    report
}

/// Number of execution units a thread pool should be designed around. Always >= 1.
pub fn max_concurrency() -> usize {
    SENSOR.max_concurrency().get()
}

/// Number of execution units usable right now. Always >= 1.
///
/// May exceed [`max_concurrency`] transiently when processors come online.
pub fn current_concurrency() -> usize {
    SENSOR.current_concurrency().get()
}

/// Snapshot of the global sensor.
pub fn report() -> ConcurrencyReport {
    SENSOR.report()
}
