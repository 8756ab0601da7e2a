//! Builds the analysis prompt and performs the single service call.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};
use tutor_adapters::gemini::GeminiFactory;
use tutor_adapters::traits::{AdapterError, GenerationRequest, GeneratorFactory};
use tutor_config::{ConfigResult, TutorSettings};
use tutor_primitives::{ApiCredential, GradeLevel};
use tutor_prompts::formula_analysis_prompt;

/// Message carried by [`ComposerError::Unknown`].
pub const UNKNOWN_FAILURE_MESSAGE: &str = "API 호출 중 알 수 없는 오류가 발생했습니다.";

/// Result alias for composer operations.
pub type ComposerResult<T> = Result<T, ComposerError>;

/// Failures surfaced by [`Composer::request_analysis`].
#[derive(Debug, Error)]
pub enum ComposerError {
    /// The service call failed; the adapter error is kept as-is.
    #[error("generative-text service failed: {source}")]
    Service {
        /// Underlying adapter failure.
        #[source]
        source: AdapterError,
    },

    /// The failure had no recognised shape.
    #[error("{message}")]
    Unknown {
        /// Always [`UNKNOWN_FAILURE_MESSAGE`].
        message: &'static str,
    },
}

impl ComposerError {
    const fn unknown() -> Self {
        Self::Unknown {
            message: UNKNOWN_FAILURE_MESSAGE,
        }
    }

    fn from_adapter(err: AdapterError) -> Self {
        match err {
            AdapterError::MissingText { reason } => {
                debug!(%reason, "service returned no text");
                Self::unknown()
            }
            source => Self::Service { source },
        }
    }

    /// Returns the adapter error behind a service failure.
    #[must_use]
    pub const fn adapter_error(&self) -> Option<&AdapterError> {
        match self {
            Self::Service { source } => Some(source),
            Self::Unknown { .. } => None,
        }
    }
}

/// Composes the analysis prompt and issues one request per call.
///
/// No retries and no caching: each call builds a fresh client from the
/// credential it is handed.
#[derive(Clone)]
pub struct Composer {
    factory: Arc<dyn GeneratorFactory>,
    model: String,
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Composer {
    /// Creates a composer calling `model` through clients built by `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn GeneratorFactory>, model: impl Into<String>) -> Self {
        Self {
            factory,
            model: model.into(),
        }
    }

    /// Creates a composer backed by Gemini as described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`](tutor_config::ConfigError) if the
    /// settings do not describe a usable endpoint.
    pub fn from_settings(settings: &TutorSettings) -> ConfigResult<Self> {
        let factory = GeminiFactory::new(settings.gemini_config()?);
        Ok(Self::new(Arc::new(factory), settings.model()))
    }

    /// Returns the model every request targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the analysis prompt for `grade` and `formula` and returns the text.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Service`] carrying the adapter failure
    /// unchanged, or [`ComposerError::Unknown`] when the service produced no
    /// recognisable text.
    pub async fn request_analysis(
        &self,
        credential: &ApiCredential,
        grade: GradeLevel,
        formula: &str,
    ) -> ComposerResult<String> {
        let result = self.call(credential, grade, formula).await;
        if let Err(err) = &result {
            error!(error = %err, model = %self.model, %grade, "formula analysis request failed");
        }
        result
    }

    async fn call(
        &self,
        credential: &ApiCredential,
        grade: GradeLevel,
        formula: &str,
    ) -> ComposerResult<String> {
        let prompt = formula_analysis_prompt(grade, formula).map_err(|err| {
            debug!(error = %err, "prompt composition failed");
            ComposerError::unknown()
        })?;
        let request =
            GenerationRequest::new(self.model.as_str(), prompt).map_err(ComposerError::from_adapter)?;

        let generator = self
            .factory
            .connect(credential)
            .map_err(ComposerError::from_adapter)?;
        let response = generator
            .generate(request)
            .await
            .map_err(ComposerError::from_adapter)?;

        Ok(response.text)
    }
}
