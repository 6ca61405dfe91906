//! `tracing` subscriber setup.

use fitify_core::config::LoggingSettings;
use fitify_core::{FitifyError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Builds the filter: `RUST_LOG` wins over the configured directive.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter).map_err(|e| {
            FitifyError::config(format!("invalid logging filter '{}': {e}", settings.filter))
        }),
    }
}

/// Installs a global fmt subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = build_filter(settings)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| FitifyError::internal(format!("failed to install tracing subscriber: {e}")))
}
