//! Google Gemini adapter.

use std::sync::Arc;
use std::{fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use hyper::{Body, Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;
use tutor_primitives::ApiCredential;

use crate::http_client::{HyperClient, build_https_client};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, GenerationRequest, GenerationResponse,
    GeneratorFactory, TextGenerator,
};

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini adapter.
///
/// Holds no credential; one is supplied each time a client is built.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            timeout: None,
        }
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Bounds each request by `timeout`. Requests are unbounded by default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the normalised base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GEMINI_MODEL)
    }
}

/// Gemini adapter that calls the `generateContent` API over HTTPS.
pub struct GeminiAdapter {
    client: HyperClient,
    base_url: String,
    metadata: AdapterMetadata,
    api_key: HeaderValue,
    timeout: Option<Duration>,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs an adapter authenticated with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the credential cannot be sent
    /// as an HTTP header.
    pub fn new(config: GeminiConfig, credential: &ApiCredential) -> AdapterResult<Self> {
        let mut api_key = HeaderValue::from_str(credential.expose()).map_err(|_| {
            AdapterError::configuration("Gemini API key contains invalid header characters")
        })?;
        api_key.set_sensitive(true);

        Ok(Self {
            client: build_https_client(),
            base_url: config.base_url,
            metadata: AdapterMetadata::new("gemini", config.model),
            api_key,
            timeout: config.timeout,
        })
    }

    fn build_uri(&self, model: &str) -> AdapterResult<Uri> {
        format!("{}v1beta/models/{model}:generateContent", self.base_url)
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))
    }

    fn build_http_request(&self, request: &GenerationRequest) -> AdapterResult<Request<Body>> {
        let body = serde_json::to_vec(&GenerateContentRequest::from_prompt(request.prompt()))
            .map_err(|err| {
                AdapterError::invalid_request(format!("failed to encode Gemini request: {err}"))
            })?;

        Request::post(self.build_uri(request.model())?)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.api_key.clone())
            .body(Body::from(body))
            .map_err(|err| AdapterError::transport(format!("failed to build Gemini request: {err}")))
    }
}

#[async_trait]
impl TextGenerator for GeminiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: GenerationRequest) -> AdapterResult<GenerationResponse> {
        let http_request = self.build_http_request(&request)?;
        debug!(model = request.model(), prompt_len = request.prompt().len(), "calling Gemini");

        let pending = self.client.request(http_request);
        let response = match self.timeout {
            Some(limit) => timeout(limit, pending)
                .await
                .map_err(|_| AdapterError::transport("Gemini request timed out"))?,
            None => pending.await,
        }
        .map_err(|err| AdapterError::transport(format!("Gemini request failed: {err}")))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            AdapterError::transport(format!("failed to read Gemini response: {err}"))
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(AdapterError::Response {
                status: status.as_u16(),
                reason: error_reason(&bytes),
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|err| AdapterError::Response {
                status: status.as_u16(),
                reason: format!("failed to decode Gemini response: {err}"),
            })?;

        let text = extract_text(decoded)?;
        debug!(model = request.model(), text_len = text.len(), "Gemini call completed");
        Ok(GenerationResponse::new(text))
    }
}

/// Builds a new [`GeminiAdapter`] for every credential handed to it.
#[derive(Clone, Debug, Default)]
pub struct GeminiFactory {
    config: GeminiConfig,
}

impl GeminiFactory {
    /// Creates a factory producing adapters with `config`.
    #[must_use]
    pub const fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration applied to each adapter.
    #[must_use]
    pub const fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl GeneratorFactory for GeminiFactory {
    fn connect(&self, credential: &ApiCredential) -> AdapterResult<Arc<dyn TextGenerator>> {
        let adapter = GeminiAdapter::new(self.config.clone(), credential)?;
        Ok(Arc::new(adapter))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

impl<'a> GenerateContentRequest<'a> {
    const fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> AdapterResult<String> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = block_reason.map_or_else(
            || "no candidates returned".to_owned(),
            |reason| format!("prompt blocked: {reason}"),
        );
        return Err(AdapterError::missing_text(reason));
    };

    let text: String = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        let reason = candidate.finish_reason.map_or_else(
            || "candidate had no text parts".to_owned(),
            |reason| format!("finish reason {reason}"),
        );
        return Err(AdapterError::missing_text(reason));
    }

    Ok(text)
}

fn error_reason(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match error.status {
            Some(status) => format!("{status}: {}", error.message),
            None => error.message,
        },
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "Gemini base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Gemini base URL: {err}")))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("valid response json")
    }

    fn adapter() -> GeminiAdapter {
        let credential = ApiCredential::new("test_key").unwrap();
        GeminiAdapter::new(GeminiConfig::default(), &credential).expect("adapter")
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::default()
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn sanitize_appends_trailing_slash() {
        let cfg = GeminiConfig::default()
            .with_base_url("https://example.com/gemini")
            .expect("valid URL");
        assert_eq!(cfg.base_url(), "https://example.com/gemini/");
    }

    #[test]
    fn default_config_has_no_timeout() {
        let cfg = GeminiConfig::default();
        assert_eq!(cfg.model(), DEFAULT_GEMINI_MODEL);
        assert!(cfg.timeout.is_none());
    }

    #[test]
    fn request_body_wraps_prompt_as_user_content() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("explain")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "explain" }] }]
            })
        );
    }

    #[test]
    fn http_request_targets_model_and_carries_key_header() {
        let request = GenerationRequest::new("gemini-2.5-pro", "hi").unwrap();
        let http = adapter().build_http_request(&request).unwrap();

        assert_eq!(
            http.uri().to_string(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
        assert_eq!(http.headers()[API_KEY_HEADER], "test_key");
        assert!(http.headers()[API_KEY_HEADER].is_sensitive());
    }

    #[test]
    fn debug_omits_credential() {
        assert!(!format!("{:?}", adapter()).contains("test_key"));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response = decode(
            r####"{"candidates":[
                {"content":{"parts":[{"text":"### 📝 공식 이름\n"},{"text":"피타고라스"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"####,
        );
        assert_eq!(extract_text(response).unwrap(), "### 📝 공식 이름\n피타고라스");
    }

    #[test]
    fn blocked_prompt_is_missing_text() {
        let response = decode(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = extract_text(response).expect_err("blocked");
        assert!(matches!(err, AdapterError::MissingText { reason } if reason.contains("SAFETY")));
    }

    #[test]
    fn empty_candidate_is_missing_text() {
        let response = decode(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#);
        let err = extract_text(response).expect_err("no text");
        assert!(matches!(err, AdapterError::MissingText { reason } if reason.contains("MAX_TOKENS")));
    }

    #[test]
    fn error_reason_prefers_structured_message() {
        let body = br#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_reason(body), "INVALID_ARGUMENT: API key not valid");
        assert_eq!(error_reason(b"bad gateway"), "bad gateway");
    }
}
