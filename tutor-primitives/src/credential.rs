//! API credential wrapper.

use std::fmt::{self, Debug, Formatter};

use crate::Error;

/// Secret key used to authenticate a single call to the generative-text service.
///
/// The value is never printed through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Wraps a secret key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCredential`] if the key is blank.
    pub fn new(key: impl Into<String>) -> crate::Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Exposes the secret for placement into an outgoing request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(<redacted>)")
    }
}
