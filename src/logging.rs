//! Optional subscriber setup for hosts without their own.
//!
//! The sensor itself only emits `tracing` events (target `hw_concurrency`);
//! a host that already installs a subscriber should not call [`init`].

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install a global subscriber with the configured filter and format.
///
/// Fails if a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!(
            "Warning: Invalid log filter '{}' ({}), using default",
            config.filter, e
        );
        EnvFilter::new(LoggingConfig::default().filter)
    });
    let json = config.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init()
}
