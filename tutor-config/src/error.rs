//! Configuration errors.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while resolving settings or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the consulted environment variables held a key.
    #[error("no API key found (checked {})", .vars.join(", "))]
    MissingCredential {
        /// Variables that were checked, in order.
        vars: Vec<&'static str>,
    },

    /// A setting failed validation.
    #[error("invalid setting: {reason}")]
    InvalidSetting {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A primitive value could not be constructed.
    #[error(transparent)]
    Primitive(#[from] tutor_primitives::Error),
}
