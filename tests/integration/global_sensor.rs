//! Public free functions backed by the process-wide sensor.

use std::sync::Barrier;

use hw_concurrency::{
    current_concurrency, max_concurrency, report, thread_signal_is_slow, SensorConfig,
};

#[test]
fn test_values_are_positive() {
    assert!(max_concurrency() >= 1);
    for _ in 0..10 {
        assert!(current_concurrency() >= 1);
    }
}

#[test]
fn test_max_is_stable() {
    let first = max_concurrency();
    for _ in 0..1000 {
        assert_eq!(max_concurrency(), first);
    }
}

#[test]
fn test_concurrent_first_use() {
    const THREADS: usize = 16;
    let barrier = Barrier::new(THREADS);

    let values: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    max_concurrency()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(values.iter().all(|&v| v == values[0]));
    assert_eq!(values[0], max_concurrency());
}

#[test]
fn test_init_keeps_first_configuration() {
    let report = hw_concurrency::init(&SensorConfig::default());
    assert_eq!(report.max, max_concurrency());

    // A second init cannot move the stable ceiling.
    let mut config = SensorConfig::default();
    config.quota.enabled = !config.quota.enabled;
    let again = hw_concurrency::init(&config);
    assert_eq!(again.max, report.max);
    assert_eq!(again.quota_aware, report.quota_aware);
}

#[test]
fn test_report_matches_free_functions() {
    let report = report();
    assert_eq!(report.max, max_concurrency());
    assert!(report.current >= 1);
    assert_eq!(report.thread_signal_is_slow, thread_signal_is_slow());
    assert!(report.processors.configured.get() >= 1);

    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["max"], serde_json::json!(report.max));
    report.log_summary();
}

#[test]
fn test_global_sensor_backs_free_functions() {
    let sensor = hw_concurrency::resolver::global();
    assert_eq!(sensor.max_concurrency().get(), max_concurrency());
    assert_eq!(sensor.report().max, report().max);
    assert!(std::ptr::eq(sensor, hw_concurrency::resolver::global()));
}

#[cfg(feature = "single-thread")]
#[test]
fn test_single_thread_pins_free_functions() {
    assert_eq!(max_concurrency(), 1);
    assert_eq!(current_concurrency(), 1);

    let report = report();
    assert!(report.single_thread);
    assert!(!report.quota.limit.is_present());
    assert_eq!(report.processors.configured.get(), 1);
    assert_eq!(report.processors.online.get(), 1);
}

#[cfg(not(target_os = "android"))]
#[test]
fn test_thread_signals_fast_off_android() {
    assert!(!thread_signal_is_slow());
}
