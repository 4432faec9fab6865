//! Gemini REST client.

use super::conversions::{answer_text, api_error_message, parse_stream_payload, to_wire};
use super::sse::SseDecoder;
use async_trait::async_trait;
use explorer_core::GenerateRequest;
use explorer_error::{GenerationError, GenerationErrorKind};
use explorer_interface::{GenerativeDriver, TextStream};
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_VERSION: &str = "v1beta";

/// Default bound on a single socket read, which covers a stalled stream.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini `generateContent` family and the Files API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use explorer_models::GeminiClient;
///
/// let client = GeminiClient::new("my-api-key", "gemini-2.5-flash")
///     .with_base_url("http://localhost:8080");
/// assert_eq!(client.base_url(), "http://localhost:8080");
/// ```
#[derive(Clone, derive_getters::Getters)]
pub struct GeminiClient {
    #[getter(skip)]
    pub(super) http: Client,
    #[getter(skip)]
    pub(super) api_key: String,
    /// Model identifier, e.g. `gemini-2.5-flash`
    model: String,
    /// API host without trailing slash
    base_url: String,
    /// Bound on non-streaming calls (blocking generation, uploads)
    request_timeout: Duration,
    /// Bound on each socket read, streaming included
    read_timeout: Duration,
}

impl GeminiClient {
    /// Creates a client for `model` authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        debug!(model = %model, "Created Gemini client");
        Self {
            http: http_client(DEFAULT_READ_TIMEOUT),
            api_key: api_key.into(),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Point the client at another host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound blocking generation and upload calls.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fail any call, streaming included, that waits longer than `timeout`
    /// for the next bytes from the server.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.http = http_client(timeout);
        self.read_timeout = timeout;
        self
    }

    pub(super) fn api_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, path)
    }

    pub(super) fn upload_url(&self) -> String {
        format!("{}/upload/{}/files", self.base_url, API_VERSION)
    }

    fn model_url(&self, method: &str) -> String {
        self.api_url(&format!("models/{}:{}", self.model, method))
    }

    async fn post_generate(
        &self,
        url: String,
        request: &GenerateRequest,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, GenerationError> {
        let body = to_wire(request);
        debug!(
            contents = body.contents.len(),
            files = request.files().len(),
            "Sending generation request"
        );

        let mut builder = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "Generation request failed");
            request_error(e, timeout.unwrap_or(self.read_timeout))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            error!(status = %status, error = %message, "Gemini API error");
            return Err(GenerationError::new(GenerationErrorKind::Http {
                status_code: status.as_u16(),
                message,
            }));
        }
        Ok(response)
    }
}

fn http_client(read_timeout: Duration) -> Client {
    Client::builder()
        .read_timeout(read_timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to a default HTTP client");
            Client::new()
        })
}

fn request_error(e: reqwest::Error, timeout: Duration) -> GenerationError {
    if e.is_timeout() {
        GenerationError::new(GenerationErrorKind::Timeout(timeout.as_secs()))
    } else {
        GenerationError::new(GenerationErrorKind::Request(e.to_string()))
    }
}

fn stream_error(e: reqwest::Error, read_timeout: Duration) -> GenerationError {
    if e.is_timeout() {
        GenerationError::new(GenerationErrorKind::Timeout(read_timeout.as_secs()))
    } else {
        GenerationError::new(GenerationErrorKind::Stream(e.to_string()))
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerativeDriver for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationError> {
        let response = self
            .post_generate(
                self.model_url("generateContent"),
                request,
                Some(self.request_timeout),
            )
            .await?;

        let body = response.text().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Stream(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        let text = answer_text(&parsed)?.unwrap_or_default();
        debug!(chars = text.len(), "Received complete answer");
        Ok(text)
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_stream(
        &self,
        request: &GenerateRequest,
    ) -> Result<TextStream, GenerationError> {
        let url = format!("{}?alt=sse", self.model_url("streamGenerateContent"));
        let response = self.post_generate(url, request, None).await?;
        let mut body = response.bytes_stream();
        let read_timeout = self.read_timeout;

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::default();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!(error = %e, "Stream read error");
                        yield Err(stream_error(e, read_timeout));
                        return;
                    }
                };
                for payload in decoder.push(&chunk) {
                    match parse_stream_payload(&payload) {
                        Ok(Some(text)) => yield Ok(text),
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }
            if let Some(payload) = decoder.finish() {
                match parse_stream_payload(&payload) {
                    Ok(Some(text)) => yield Ok(text),
                    Ok(None) => {}
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
