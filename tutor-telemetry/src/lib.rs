//! Observability utilities for the formula tutor.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed: {reason}")]
    AlreadyInstalled {
        /// Message from the subscriber registry.
        reason: String,
    },
}

/// Builds the filter from `RUST_LOG`, falling back to `fallback`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a `fmt` subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInstalled`] if called twice in a process.
pub fn init() -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVE))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled {
            reason: err.to_string(),
        })
}
