//! Shared error definitions for tutor primitives.

use thiserror::Error;

/// Result alias used throughout the tutor crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The supplied label does not name a known grade level.
    #[error("unknown grade level `{label}`")]
    InvalidGradeLevel {
        /// The offending label.
        label: String,
    },

    /// An API credential was empty or whitespace only.
    #[error("API credential must not be empty")]
    EmptyCredential,
}
