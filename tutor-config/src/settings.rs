//! Strongly typed tutor settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tutor_adapters::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiConfig};
use tutor_primitives::GradeLevel;

use crate::{ConfigError, ConfigResult};

/// Service endpoint and form defaults.
///
/// Deserialises from any serde format; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorSettings {
    model: String,
    base_url: String,
    default_grade: GradeLevel,
    request_timeout_ms: Option<u64>,
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            default_grade: GradeLevel::default(),
            request_timeout_ms: None,
        }
    }
}

impl TutorSettings {
    /// Overrides the model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for a blank model.
    pub fn with_model(mut self, model: impl Into<String>) -> ConfigResult<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                reason: "model must not be empty".to_owned(),
            });
        }
        self.model = model;
        Ok(self)
    }

    /// Overrides the service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the URL is malformed.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> ConfigResult<Self> {
        let validated = GeminiConfig::new(&self.model)
            .with_base_url(base_url)
            .map_err(|err| ConfigError::InvalidSetting {
                reason: err.to_string(),
            })?;
        validated.base_url().clone_into(&mut self.base_url);
        Ok(self)
    }

    /// Sets the grade preselected in the form.
    #[must_use]
    pub const fn with_default_grade(mut self, grade: GradeLevel) -> Self {
        self.default_grade = grade;
        self
    }

    /// Bounds each request by `timeout`. Unbounded unless set.
    ///
    /// Stored in whole milliseconds, rounded up so a non-zero timeout never
    /// collapses to zero.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.request_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the service base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the grade preselected in the form.
    #[must_use]
    pub const fn default_grade(&self) -> GradeLevel {
        self.default_grade
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Translates these settings into an adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the stored base URL is invalid,
    /// which can happen for deserialised settings.
    pub fn gemini_config(&self) -> ConfigResult<GeminiConfig> {
        let mut config = GeminiConfig::new(&self.model)
            .with_base_url(&self.base_url)
            .map_err(|err| ConfigError::InvalidSetting {
                reason: err.to_string(),
            })?;
        if let Some(timeout) = self.request_timeout() {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}
