use async_trait::async_trait;

use crate::error::ApiError;

/// Trait for executing a fully built HTTP request.
///
/// This abstraction separates request construction and failure
/// interpretation (the gateway's job) from the wire itself, so tests can
/// substitute canned responses. Implementations must be thread-safe.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return the raw response.
    ///
    /// Only transport-level failures (no response received) are errors here;
    /// non-2xx responses are returned as responses and classified by the
    /// gateway.
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiError> {
        self.client
            .execute(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}
