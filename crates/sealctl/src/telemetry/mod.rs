//! Telemetry initialisation for sealctl.
//!
//! Structured JSON logs only, written to stderr because stdout carries the
//! sealed or opened payload.
//!
//! # Telemetry invariants
//!
//! - **No key material or plaintext** may appear in any log field. Only sizes,
//!   key counts and outcomes are logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise sealctl tracing subscriber: {e}"))
}
