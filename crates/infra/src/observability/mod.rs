//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured filter when it is set.

use maayegue_domain::{LoggingConfig, MaayegueError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// # Errors
/// Returns `MaayegueError::Config` for an invalid filter directive and
/// `MaayegueError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|e| MaayegueError::Internal(format!("Failed to install subscriber: {e}")))?;

    tracing::debug!(json = config.json, "Tracing initialised");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            MaayegueError::Config(format!("Invalid log filter '{}': {e}", config.filter))
        }),
    }
}
