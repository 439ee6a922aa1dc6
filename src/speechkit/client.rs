use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tokio::time::{timeout_at, Instant};

use super::{FetchError, SpeechTransport, SynthesisRequest, DEFAULT_BASE_URL};

/// Default per-attempt deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the SpeechKit `generate` endpoint.
///
/// Every call is one attempt bounded by a single deadline that covers both
/// waiting for the response head and reading the body. Which of the two phases
/// the deadline expired in decides the error kind.
#[derive(Debug, Clone)]
pub struct SpeechKitClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl SpeechKitClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("t2s/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with custom settings: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SpeechKitClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl SpeechTransport for SpeechKitClient {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<Bytes, FetchError> {
        let deadline = Instant::now() + self.timeout;

        let send = self
            .client
            .get(&self.base_url)
            .query(&request.query())
            .send();

        // `send` resolves as soon as the status line and headers are in
        let response = timeout_at(deadline, send)
            .await
            .map_err(|_| FetchError::HeaderTimeout(self.timeout))??;

        let status = response.status();
        let body = timeout_at(deadline, response.bytes()).await;

        if !status.is_success() {
            // An unreadable body leaves the detail empty, the status still stands
            let body = match body {
                Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
                _ => String::new(),
            };
            return Err(FetchError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = body.map_err(|_| {
            FetchError::transport(format!(
                "timed out after {:?} reading response body",
                self.timeout
            ))
        })??;

        Ok(body)
    }
}
