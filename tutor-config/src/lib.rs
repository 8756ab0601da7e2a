//! Configuration management for the formula tutor.
//!
//! Everything is injected explicitly: [`TutorSettings`] describes the service
//! endpoint and UI defaults, and a [`CredentialSource`] is consulted on every
//! submission so a rotated key takes effect without a restart.

#![warn(missing_docs, clippy::pedantic)]

mod credentials;
mod error;
mod settings;

pub use credentials::{
    CredentialSource, EnvCredentials, PRIMARY_KEY_ENV, SECONDARY_KEY_ENV, StaticCredentials,
};
pub use error::{ConfigError, ConfigResult};
pub use settings::TutorSettings;
