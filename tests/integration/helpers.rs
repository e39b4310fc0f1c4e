//! Test helpers and utilities

use std::fs;
use tempfile::TempDir;

/// A fake cgroup mount root on disk.
pub struct FakeCgroup {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl FakeCgroup {
    /// Empty root: neither cgroup v2 nor v1 files exist.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Root with a cgroup v2 `cpu.max` file.
    pub fn v2(cpu_max: &str) -> Self {
        let cgroup = Self::empty();
        fs::write(cgroup.dir.path().join("cpu.max"), cpu_max).expect("Failed to write cpu.max");
        cgroup
    }

    /// Root with cgroup v1 quota and period files.
    pub fn v1(quota: &str, period: &str) -> Self {
        let cgroup = Self::empty();
        let cpu = cgroup.dir.path().join("cpu");
        fs::create_dir(&cpu).expect("Failed to create cpu dir");
        fs::write(cpu.join("cpu.cfs_quota_us"), quota).expect("Failed to write quota");
        fs::write(cpu.join("cpu.cfs_period_us"), period).expect("Failed to write period");
        cgroup
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
