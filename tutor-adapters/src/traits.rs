//! Shared adapter traits and data structures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tutor_primitives::ApiCredential;

/// Result alias used by adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid generation request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (network, TLS, timeouts).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("adapter rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
    },

    /// The provider answered with an error status or an undecodable body.
    #[error("adapter response error ({status}): {reason}")]
    Response {
        /// HTTP status returned by the provider.
        status: u16,
        /// Additional context about the response failure.
        reason: String,
    },

    /// The provider answered successfully but produced no text.
    #[error("response contained no text: {reason}")]
    MissingText {
        /// Why no text was available (e.g. a block reason).
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for text-less responses.
    #[must_use]
    pub fn missing_text(reason: impl Into<String>) -> Self {
        Self::MissingText {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing an adapter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "gemini").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// A single `generate(model, prompt)` call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerationRequest {
    model: String,
    prompt: String,
}

impl GenerationRequest {
    /// Creates a request for `model` with the supplied prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the model or prompt is empty.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> AdapterResult<Self> {
        let model = model.into();
        let prompt = prompt.into();
        if model.trim().is_empty() {
            return Err(AdapterError::invalid_request(
                "generation request requires a model",
            ));
        }
        if prompt.is_empty() {
            return Err(AdapterError::invalid_request(
                "generation request requires a prompt",
            ));
        }
        Ok(Self { model, prompt })
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Text payload returned by a successful generation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Generated text.
    pub text: String,
}

impl GenerationResponse {
    /// Wraps generated text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Trait implemented by text generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns basic metadata describing the adapter instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Performs one generation call and returns its text.
    async fn generate(&self, request: GenerationRequest) -> AdapterResult<GenerationResponse>;
}

/// Builds a fresh [`TextGenerator`] bound to a credential.
///
/// Called once per analysis so every request uses the credential current at
/// call time.
pub trait GeneratorFactory: Send + Sync {
    /// Constructs a generator authenticated with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] when a client cannot be built.
    fn connect(&self, credential: &ApiCredential) -> AdapterResult<Arc<dyn TextGenerator>>;
}
