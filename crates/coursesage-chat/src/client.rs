//! Completion client with timeout, one bounded retry, and cancellation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use coursesage_core::CompletionSettings;

use crate::providers::{self, ProviderRequest};
use crate::types::{ChatMessage, ResolvedProvider};

/// Total attempts per call: the first try plus one retry.
const MAX_ATTEMPTS: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// No credential configured. Raised before any network I/O.
    #[error("completion provider not configured")]
    ProviderUnavailable,

    /// Transport failure or non-success response.
    #[error("completion provider error: {0}")]
    ProviderError(String),

    /// The caller abandoned the request.
    #[error("completion cancelled")]
    Cancelled,
}

/// Seam between the pipeline and the hosted model.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Whether a provider credential was configured at startup.
    fn is_available(&self) -> bool;

    /// Active model name, if any.
    fn model(&self) -> Option<&str>;

    /// Send a prompt and return the generated text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: usize,
        temperature: f64,
        cancel: &CancellationToken,
    ) -> Result<String, CompletionError>;
}

/// One failed attempt and whether it is worth retrying.
struct AttemptFailure {
    message: String,
    transient: bool,
}

/// reqwest-backed client for the provider resolved at startup.
pub struct CompletionClient {
    http: Client,
    provider: Option<ResolvedProvider>,
    retry_backoff: Duration,
    /// Replaces the provider's public URL, e.g. for a proxy.
    endpoint: Option<String>,
}

impl CompletionClient {
    /// Build a client. `provider = None` yields a permanently unavailable client.
    pub fn new(
        provider: Option<ResolvedProvider>,
        settings: &CompletionSettings,
    ) -> coursesage_core::Result<Self> {
        let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
        let http = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| coursesage_core::Error::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            provider,
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
            endpoint: None,
        })
    }

    /// Send requests to `url` instead of the provider's public endpoint.
    /// Wire format and headers stay those of the resolved provider.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    async fn send_once(
        &self,
        resolved: &ResolvedProvider,
        request: &ProviderRequest,
    ) -> Result<String, AttemptFailure> {
        let url = self.endpoint.as_deref().unwrap_or(request.url);
        let mut builder = self.http.post(url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| AttemptFailure {
            transient: e.is_timeout() || e.is_connect(),
            message: format!("Request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure {
                transient: is_transient_status(status),
                message: format!("API error {}: {}", status, truncate(&body, 300)),
            });
        }

        let value: serde_json::Value = response.json().await.map_err(|e| AttemptFailure {
            transient: e.is_timeout(),
            message: format!("Invalid response body: {}", e),
        })?;

        providers::extract_text(resolved.provider, &value).ok_or_else(|| AttemptFailure {
            transient: false,
            message: "Response carried no generated text".into(),
        })
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl ChatCompleter for CompletionClient {
    fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    fn model(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model.as_str())
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: usize,
        temperature: f64,
        cancel: &CancellationToken,
    ) -> Result<String, CompletionError> {
        let resolved = self
            .provider
            .as_ref()
            .ok_or(CompletionError::ProviderUnavailable)?;
        let request = providers::build_request(resolved, messages, max_tokens, temperature);

        let mut attempt = 1;
        loop {
            debug!(
                "Completion request to {} with model {} (attempt {})",
                resolved.provider, resolved.model, attempt
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CompletionError::Cancelled),
                outcome = self.send_once(resolved, &request) => outcome,
            };

            let failure = match outcome {
                Ok(text) => return Ok(text),
                Err(failure) => failure,
            };

            if !failure.transient || attempt >= MAX_ATTEMPTS {
                return Err(CompletionError::ProviderError(failure.message));
            }

            warn!(
                "Transient completion failure on attempt {}: {}; retrying in {}ms",
                attempt,
                failure.message,
                self.retry_backoff.as_millis()
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CompletionError::Cancelled),
                _ = tokio::time::sleep(self.retry_backoff) => {}
            }
            attempt += 1;
        }
    }
}
