//! Platform capability flags for thread lifecycle code.

/// First Android API level (7.0 "Nougat") with responsive thread signals.
pub const SLOW_SIGNALS_API_CUTOFF: i32 = 24;

/// Whether signals sent to threads are slow or unreliable at the given Android API level.
///
/// Unknown levels are reported as negative and count as slow.
pub const fn signals_slow_for_api_level(api_level: i32) -> bool {
    api_level < SLOW_SIGNALS_API_CUTOFF
}

/// Whether signalling/cancelling worker threads is known to be slow on this platform.
///
/// Evaluated once per process on Android; `false` everywhere else.
#[cfg(target_os = "android")]
pub fn thread_signal_is_slow() -> bool {
    use std::sync::OnceLock;

    static SLOW: OnceLock<bool> = OnceLock::new();
    *SLOW.get_or_init(|| {
        let level = android::device_api_level();
        let slow = signals_slow_for_api_level(level);
        tracing::debug!("Android API level {}: slow thread signals = {}", level, slow);
        slow
    })
}

#[cfg(not(target_os = "android"))]
#[inline]
pub const fn thread_signal_is_slow() -> bool {
    false
}

#[cfg(target_os = "android")]
mod android {
    use std::ffi::CStr;

    // Bionic's PROP_VALUE_MAX.
    const PROP_VALUE_MAX: usize = 92;

    /// Device API level from `ro.build.version.sdk`, or -1 when unavailable.
    pub fn device_api_level() -> i32 {
        let mut value = [0 as libc::c_char; PROP_VALUE_MAX];
        // SAFETY: the name is NUL-terminated and value holds PROP_VALUE_MAX bytes.
        let len = unsafe {
            libc::__system_property_get(c"ro.build.version.sdk".as_ptr(), value.as_mut_ptr())
        };
        if len <= 0 {
            return -1;
        }
        // SAFETY: a successful lookup writes a NUL-terminated string into value.
        let raw = unsafe { CStr::from_ptr(value.as_ptr()) };
        raw.to_str()
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(-1)
    }
}
