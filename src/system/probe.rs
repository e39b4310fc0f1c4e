//! Native processor count queries.
//!
//! Exactly one tier is compiled in:
//!
//! - **wasm**: logical cores when the build has thread support (`atomics`), else 1
//! - **unix**: `sysconf` distinguishes configured cores from online cores
//! - **generic**: `num_cpus` stands in for both

use std::num::NonZeroUsize;

use serde::Serialize;

pub use imp::TIER;

/// Configured and online processor counts taken together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessorCounts {
    /// Cores the OS knows about, including offline ones where that is visible.
    pub configured: NonZeroUsize,
    /// Cores schedulable right now. May change between two calls.
    pub online: NonZeroUsize,
}

impl ProcessorCounts {
    /// Both counts pinned to 1, without touching the OS.
    pub const fn single() -> Self {
        Self {
            configured: NonZeroUsize::MIN,
            online: NonZeroUsize::MIN,
        }
    }

    pub fn probe() -> Self {
        Self {
            configured: configured_processors(),
            online: online_processors(),
        }
    }
}

/// Total processors known to the OS.
pub fn configured_processors() -> NonZeroUsize {
    at_least_one(imp::configured())
}

/// Processors currently online.
pub fn online_processors() -> NonZeroUsize {
    at_least_one(imp::online())
}

fn at_least_one(count: usize) -> NonZeroUsize {
    NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(target_family = "wasm")]
mod imp {
    pub const TIER: &str = "wasm";

    pub fn threading_supported() -> bool {
        cfg!(target_feature = "atomics")
    }

    pub fn configured() -> usize {
        if threading_supported() {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            1
        }
    }

    pub fn online() -> usize {
        configured()
    }
}

#[cfg(all(unix, not(target_family = "wasm")))]
mod imp {
    use tracing::trace;

    pub const TIER: &str = "sysconf";

    pub fn configured() -> usize {
        sysconf_or_generic(libc::_SC_NPROCESSORS_CONF, "_SC_NPROCESSORS_CONF")
    }

    pub fn online() -> usize {
        sysconf_or_generic(libc::_SC_NPROCESSORS_ONLN, "_SC_NPROCESSORS_ONLN")
    }

    // sysconf rather than get_nprocs(): older Android libcs lack the latter.
    fn sysconf_or_generic(name: libc::c_int, label: &str) -> usize {
        // SAFETY: sysconf only reads process-wide configuration.
        let count = unsafe { libc::sysconf(name) };
        if count > 0 {
            count as usize
        } else {
            trace!("sysconf({}) returned {}, using num_cpus", label, count);
            num_cpus::get()
        }
    }
}

#[cfg(not(any(unix, target_family = "wasm")))]
mod imp {
    pub const TIER: &str = "generic";

    pub fn configured() -> usize {
        num_cpus::get()
    }

    pub fn online() -> usize {
        num_cpus::get()
    }
}
