//! Cgroup CPU quota detection.
//!
//! Reads the container CPU allocation from either the cgroup v2 unified
//! file (`cpu.max`) or, when that cannot be opened, the cgroup v1 pair
//! (`cpu/cpu.cfs_quota_us` + `cpu/cpu.cfs_period_us`), and turns it into a
//! whole number of cores.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::QuotaConfig;

/// Raw sentinel for "no value" in quota/period microseconds.
pub const ABSENT: i64 = -1;

/// Read buffer for `cpu.max` ("$MAX $PERIOD\n").
const UNIFIED_BUF_LEN: usize = 128;

/// Read buffer for each cgroup v1 file (one decimal integer).
const LEGACY_BUF_LEN: usize = 64;

/// Cgroup interface the quota was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupVersion {
    /// cgroup v2 (unified hierarchy)
    V2,
    /// cgroup v1 (legacy hierarchy)
    V1,
    /// No cgroup interface consulted (disabled, unsupported or unreadable)
    None,
}

impl fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => write!(f, "v2"),
            Self::V1 => write!(f, "v1"),
            Self::None => write!(f, "none"),
        }
    }
}

/// How a fractional core allocation (e.g. 1.5 CPUs) becomes a whole count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// `(quota + period / 2) / period`
    #[default]
    HalfUp,
    /// Any fraction rounds up.
    Ceil,
    /// Any fraction is dropped.
    Floor,
}

impl Rounding {
    /// Whole cores for `quota / period`, never less than 1.
    ///
    /// Both arguments must be strictly positive; [`QuotaLimit::from_quota`] checks that.
    pub(crate) fn cores(self, quota: i64, period: i64) -> NonZeroUsize {
        debug_assert!(quota > 0 && period > 0);
        let whole = match self {
            Self::HalfUp => quota.saturating_add(period / 2) / period,
            Self::Ceil => quota.saturating_add(period - 1) / period,
            Self::Floor => quota / period,
        };
        let whole = usize::try_from(whole).unwrap_or(usize::MAX);
        NonZeroUsize::new(whole).unwrap_or(NonZeroUsize::MIN)
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HalfUp => write!(f, "half-up"),
            Self::Ceil => write!(f, "ceil"),
            Self::Floor => write!(f, "floor"),
        }
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "half-up" | "half_up" | "round" => Ok(Self::HalfUp),
            "ceil" | "up" => Ok(Self::Ceil),
            "floor" | "down" => Ok(Self::Floor),
            other => Err(format!(
                "unknown rounding policy '{}', expected: half-up, ceil, floor",
                other
            )),
        }
    }
}

/// Container CPU limit in whole cores, or absent when no quota applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuotaLimit(Option<NonZeroUsize>);

impl QuotaLimit {
    /// No quota in effect.
    pub const fn absent() -> Self {
        Self(None)
    }

    pub const fn cores(count: NonZeroUsize) -> Self {
        Self(Some(count))
    }

    pub fn get(&self) -> Option<NonZeroUsize> {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Core count, or [`ABSENT`] (-1).
    pub fn as_raw(&self) -> i64 {
        self.0.map_or(ABSENT, |n| n.get() as i64)
    }

    /// Resolve a quota/period pair. Anything not strictly positive means no limit.
    pub fn from_quota(quota: i64, period: i64, rounding: Rounding) -> Self {
        if quota > 0 && period > 0 {
            Self::cores(rounding.cores(quota, period))
        } else {
            Self::absent()
        }
    }
}

/// Result of one quota probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaReading {
    /// Interface the values came from.
    pub version: CgroupVersion,
    /// Quota in microseconds per period, [`ABSENT`] if unknown or unlimited.
    pub quota_us: i64,
    /// Period in microseconds, [`ABSENT`] if unknown.
    pub period_us: i64,
    /// Resolved whole-core limit.
    pub limit: QuotaLimit,
}

impl QuotaReading {
    /// Reading for when no interface is consulted at all.
    pub const fn none() -> Self {
        Self {
            version: CgroupVersion::None,
            quota_us: ABSENT,
            period_us: ABSENT,
            limit: QuotaLimit::absent(),
        }
    }
}

/// Failure reading a single cgroup file. Always degraded to "no limit".
#[derive(Debug)]
pub enum QuotaError {
    /// File could not be opened or read.
    Io { path: PathBuf, error: io::Error },
    /// File content filled the whole read buffer.
    Oversized { path: PathBuf, limit: usize },
    /// File content is not in the expected format.
    Malformed { path: PathBuf, content: String },
}

impl fmt::Display for QuotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaError::Io { path, error } => {
                write!(f, "IO error for '{}': {}", path.display(), error)
            }
            QuotaError::Oversized { path, limit } => {
                write!(f, "'{}' holds {} bytes or more", path.display(), limit)
            }
            QuotaError::Malformed { path, content } => {
                write!(f, "malformed content in '{}': {:?}", path.display(), content)
            }
        }
    }
}

impl std::error::Error for QuotaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuotaError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Reads CPU quota files below a cgroup mount root.
#[derive(Debug, Clone)]
pub struct QuotaReader {
    root: PathBuf,
    rounding: Rounding,
}

impl QuotaReader {
    pub fn new(root: impl Into<PathBuf>, rounding: Rounding) -> Self {
        Self {
            root: root.into(),
            rounding,
        }
    }

    pub fn from_config(config: &QuotaConfig) -> Self {
        Self::new(config.cgroup_root.clone(), config.rounding)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Probe the quota. Never fails: every problem yields an absent limit.
    pub fn read(&self) -> QuotaReading {
        let unified = self.root.join("cpu.max");
        let reading = match File::open(&unified) {
            Ok(file) => self.read_unified(&unified, file),
            Err(e) => {
                trace!("cgroup v2 {} unavailable: {}", unified.display(), e);
                self.read_legacy()
            }
        };

        match reading.limit.get() {
            Some(cores) => debug!(
                "Container CPU quota ({}): {}/{} us = {} cores ({})",
                reading.version, reading.quota_us, reading.period_us, cores, self.rounding
            ),
            None => debug!("No container CPU quota ({})", reading.version),
        }
        reading
    }

    /// cgroup v2 `cpu.max`: "$MAX $PERIOD" or "max $PERIOD".
    fn read_unified(&self, path: &Path, file: File) -> QuotaReading {
        let (quota_us, period_us) = match read_bounded(path, file, UNIFIED_BUF_LEN)
            .and_then(|content| parse_cpu_max(path, &content))
        {
            Ok(pair) => pair,
            Err(e) => {
                debug!("Ignoring cgroup v2 quota: {}", e);
                (ABSENT, ABSENT)
            }
        };

        QuotaReading {
            version: CgroupVersion::V2,
            quota_us,
            period_us,
            limit: QuotaLimit::from_quota(quota_us, period_us, self.rounding),
        }
    }

    /// cgroup v1: quota and period in separate files, read independently.
    fn read_legacy(&self) -> QuotaReading {
        let quota_path = self.root.join("cpu").join("cpu.cfs_quota_us");
        let period_path = self.root.join("cpu").join("cpu.cfs_period_us");

        let quota = read_int(&quota_path);
        let period = read_int(&period_path);
        let version = if quota.is_ok() || period.is_ok() {
            CgroupVersion::V1
        } else {
            CgroupVersion::None
        };

        let quota_us = quota.unwrap_or_else(|e| {
            trace!("cgroup v1 quota unavailable: {}", e);
            ABSENT
        });
        let period_us = period.unwrap_or_else(|e| {
            trace!("cgroup v1 period unavailable: {}", e);
            ABSENT
        });

        QuotaReading {
            version,
            quota_us,
            period_us,
            limit: QuotaLimit::from_quota(quota_us, period_us, self.rounding),
        }
    }
}

/// Read at most `limit - 1` bytes; a full buffer is treated as malformed input.
fn read_bounded(path: &Path, file: File, limit: usize) -> Result<String, QuotaError> {
    let mut buf = Vec::with_capacity(limit);
    file.take(limit as u64)
        .read_to_end(&mut buf)
        .map_err(|error| QuotaError::Io {
            path: path.to_path_buf(),
            error,
        })?;

    if buf.len() >= limit {
        return Err(QuotaError::Oversized {
            path: path.to_path_buf(),
            limit,
        });
    }

    String::from_utf8(buf).map_err(|e| QuotaError::Malformed {
        path: path.to_path_buf(),
        content: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Parse cgroup v2 `cpu.max` content into (quota, period).
///
/// `max` as the first token is the unlimited marker and yields quota 0.
pub fn parse_cpu_max(path: &Path, content: &str) -> Result<(i64, i64), QuotaError> {
    let malformed = || QuotaError::Malformed {
        path: path.to_path_buf(),
        content: content.to_string(),
    };

    let mut parts = content.split_whitespace();
    let quota = match parts.next() {
        Some("max") => 0,
        Some(token) => token.parse::<i64>().map_err(|_| malformed())?,
        None => return Err(malformed()),
    };
    let period = parts
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or_else(malformed)?;

    Ok((quota, period))
}

/// Read one decimal integer from a cgroup v1 file.
fn read_int(path: &Path) -> Result<i64, QuotaError> {
    let file = File::open(path).map_err(|error| QuotaError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let content = read_bounded(path, file, LEGACY_BUF_LEN)?;
    content
        .trim()
        .parse::<i64>()
        .map_err(|_| QuotaError::Malformed {
            path: path.to_path_buf(),
            content,
        })
}
