//! Integration tests for hw_concurrency
//!
//! These tests exercise the process-wide sensor through the public API.
//! The global sensor is configured once per test binary, so every test here
//! must tolerate whichever configuration the first caller installed.

mod helpers;

mod global_sensor;
mod quota_files;
