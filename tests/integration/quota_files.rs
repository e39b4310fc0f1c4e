//! Quota reader and sensor behaviour against fake cgroup trees.

use crate::helpers::FakeCgroup;
use hw_concurrency::config::QuotaConfig;
use hw_concurrency::system::{CgroupVersion, QuotaReader, Rounding};
use hw_concurrency::Sensor;

fn whole_cores(cgroup: &FakeCgroup) -> Option<usize> {
    QuotaReader::new(cgroup.path(), Rounding::HalfUp)
        .read()
        .limit
        .get()
        .map(|n| n.get())
}

#[test]
fn test_round_half_up_table() {
    let cases = [
        ("150000 100000", Some(2)),
        ("50000 100000", Some(1)),
        ("10000 100000", Some(1)),
        ("100000 100000", Some(1)),
        ("149999 100000", Some(1)),
        ("800000 100000", Some(8)),
        ("max 100000", None),
        ("0 100000", None),
        ("-1 100000", None),
        ("100000 0", None),
    ];

    for (content, expected) in cases {
        let cgroup = FakeCgroup::v2(content);
        assert_eq!(whole_cores(&cgroup), expected, "cpu.max = {:?}", content);
    }
}

#[test]
fn test_v1_fallback() {
    let cgroup = FakeCgroup::v1("350000\n", "100000\n");
    let reading = QuotaReader::new(cgroup.path(), Rounding::HalfUp).read();
    assert_eq!(reading.version, CgroupVersion::V1);
    assert_eq!(reading.limit.get().map(|n| n.get()), Some(4));
}

#[test]
fn test_garbage_never_yields_zero() {
    let inputs = ["", "\n", "max", "max max", "1e5 1e5", "-", "99999999999999999999 1"];
    for content in inputs {
        let cgroup = FakeCgroup::v2(content);
        let sensor = Sensor::with_config(QuotaConfig::default().with_cgroup_root(cgroup.path()));
        assert!(sensor.max_concurrency().get() >= 1, "cpu.max = {:?}", content);
        assert!(sensor.current_concurrency().get() >= 1, "cpu.max = {:?}", content);
    }

    let cgroup = FakeCgroup::empty();
    let sensor = Sensor::with_config(QuotaConfig::default().with_cgroup_root(cgroup.path()));
    assert!(sensor.max_concurrency().get() >= 1);
    assert!(sensor.current_concurrency().get() >= 1);
}

#[cfg(all(feature = "cgroup-limits", target_os = "linux", not(feature = "single-thread")))]
#[test]
fn test_sensor_obeys_quota() {
    let cgroup = FakeCgroup::v1("150000", "100000");
    let sensor = Sensor::with_config(QuotaConfig::default().with_cgroup_root(cgroup.path()));
    assert_eq!(sensor.max_concurrency().get(), 2);
    assert_eq!(sensor.current_concurrency().get(), 2);
}
