use thiserror::Error;

/// Errors surfaced by the gateway and the domain adapters.
///
/// Every variant carries a message suitable for direct display to the
/// operator. The variants distinguish the four failure classes callers care
/// about: the service was unreachable, the session is no longer valid, the
/// service rejected the request, or the request never left the client.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received from the service (DNS, connect, TLS, or
    /// mid-body failure). Distinct from a rejection: the service may be down.
    #[error("Service unreachable: {0}")]
    Transport(String),

    /// The service answered 401. The gateway has already cleared the session
    /// and signalled sign-out before this error reaches the caller.
    #[error("Session expired or invalid, please log in again")]
    Authorization,

    /// The service was reachable but rejected the request. `detail` is the
    /// server-supplied human-readable message when one was present, else a
    /// generic description of the failed operation.
    #[error("{detail}")]
    Service {
        /// HTTP status code of the rejection
        status: u16,
        /// Displayable failure message
        detail: String,
    },

    /// Client-side validation failed; the request was never dispatched.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Build a `Service` error from a status code and an optional
    /// server-supplied detail message, falling back to `category`
    /// (e.g. "inspection failed") when the body carried none.
    pub fn service(status: u16, detail: Option<String>, category: &str) -> Self {
        ApiError::Service {
            status,
            detail: detail.unwrap_or_else(|| category.to_string()),
        }
    }

    /// True if this error means the session was invalidated.
    pub fn is_authorization(&self) -> bool {
        matches!(self, ApiError::Authorization)
    }
}
