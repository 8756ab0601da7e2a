//! Credential sources resolved at call time.

use std::fmt;

use tracing::debug;
use tutor_primitives::ApiCredential;

use crate::{ConfigError, ConfigResult};

/// Environment variable consulted first for the API key.
pub const PRIMARY_KEY_ENV: &str = "API_KEY";

/// Fallback environment variable for the API key.
pub const SECONDARY_KEY_ENV: &str = "GEMINI_API_KEY";

/// Supplies the credential for one analysis request.
pub trait CredentialSource: Send + Sync {
    /// Resolves the credential current at call time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no key is available.
    fn resolve(&self) -> ConfigResult<ApiCredential>;
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Reads the key from the process environment on every call.
pub struct EnvCredentials {
    lookup: Box<Lookup>,
}

impl EnvCredentials {
    /// Reads from the real process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Reads through a custom lookup, e.g. a fixed map in tests.
    #[must_use]
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCredentials").finish_non_exhaustive()
    }
}

impl CredentialSource for EnvCredentials {
    fn resolve(&self) -> ConfigResult<ApiCredential> {
        for var in [PRIMARY_KEY_ENV, SECONDARY_KEY_ENV] {
            let Some(value) = (self.lookup)(var) else {
                continue;
            };
            match ApiCredential::new(value) {
                Ok(credential) => {
                    debug!(source = var, "resolved API credential");
                    return Ok(credential);
                }
                Err(_) => debug!(source = var, "ignoring blank API credential"),
            }
        }

        Err(ConfigError::MissingCredential {
            vars: vec![PRIMARY_KEY_ENV, SECONDARY_KEY_ENV],
        })
    }
}

/// Always yields the same credential.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credential: ApiCredential,
}

impl StaticCredentials {
    /// Wraps an already validated credential.
    #[must_use]
    pub const fn new(credential: ApiCredential) -> Self {
        Self { credential }
    }

    /// Validates and wraps a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Primitive`] if the key is blank.
    pub fn from_key(key: impl Into<String>) -> ConfigResult<Self> {
        Ok(Self::new(ApiCredential::new(key)?))
    }
}

impl CredentialSource for StaticCredentials {
    fn resolve(&self) -> ConfigResult<ApiCredential> {
        Ok(self.credential.clone())
    }
}
