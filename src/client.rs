use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::observability::{PROVIDER_REQUEST_ERRORS, PROVIDER_REQUESTS, PROVIDER_TTFB};
use crate::provider::{MessageStream, ModelProvider};
use crate::sse::process_sse;
use crate::types::MessageCreateParams;

/// The provider's public endpoint.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Client for the Anthropic API.
#[derive(Debug, Clone)]
pub struct Anthropic {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Anthropic {
    /// Create a new Anthropic client with the given credential.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: impl AsRef<str>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.as_ref();
        if api_key.trim().is_empty() {
            return Err(Error::configuration("provider credential missing"));
        }
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::validation(
                "API key contains characters not allowed in a header",
                Some("api_key".to_string()),
            )
        })?;
        api_key.set_sensitive(true);

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        headers.insert("x-api-key", self.api_key.clone());
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        headers
    }

    /// Turn a non-success response into an [`Error::Api`].
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let request_id = response
            .headers()
            .get("request-id")
            .or_else(|| response.headers().get("x-request-id"))
            .and_then(|val| val.to_str().ok())
            .map(String::from);
        match response.text().await {
            Ok(body) => error_from_body(status_code, request_id, &body),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {e}"),
                Some(Box::new(e)),
            ),
        }
    }

    /// Send a message to the API and get a streaming response.
    ///
    /// Returns a stream of events that can be processed incrementally.  The
    /// `stream` flag on `params` is forced on.
    pub async fn stream(&self, mut params: MessageCreateParams) -> Result<MessageStream> {
        params.stream = true;
        let url = format!("{}messages", self.base_url);

        PROVIDER_REQUESTS.click();
        tracing::debug!(model = %params.model, max_tokens = params.max_tokens, "sending streaming request");
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                PROVIDER_REQUEST_ERRORS.click();
                Error::from_send(e, Some(self.timeout.as_secs_f64()))
            })?;
        PROVIDER_TTFB.add(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            PROVIDER_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(Box::pin(process_sse(response.bytes_stream())))
    }
}

/// Read the provider's `{"error": {"type", "message"}}` body, falling back
/// to the raw text.
fn error_from_body(status_code: u16, request_id: Option<String>, body: &str) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        #[serde(rename = "type")]
        error_type: Option<String>,
        message: Option<String>,
    }

    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let error_type = detail.as_ref().and_then(|d| d.error_type.clone());
    let message = detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| body.to_string());
    Error::api(status_code, error_type, message, request_id)
}

#[async_trait::async_trait]
impl ModelProvider for Anthropic {
    async fn stream(&self, params: MessageCreateParams) -> Result<MessageStream> {
        Anthropic::stream(self, params).await
    }
}
