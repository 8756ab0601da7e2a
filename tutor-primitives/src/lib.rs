//! Core shared types for the formula tutor.

#![warn(missing_docs, clippy::pedantic)]

mod credential;
mod error;
mod grade;

/// Secret used to authenticate against the generative-text service.
pub use credential::ApiCredential;
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Fixed, ordered set of school grades a student can pick from.
pub use grade::GradeLevel;
