use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::multipart;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::client::request::{ApiRequest, FilePart, Payload, FILES_FIELD, FILE_FIELD};
use crate::client::transport::{HttpTransport, Transport};
use crate::error::ApiError;
use crate::session::SessionStore;

/// Response header carrying the string-encoded anomaly score of a single
/// inspection.
pub const HEADER_ANOMALY_SCORE: &str = "x-anomaly-score";

/// Response header carrying the classification verdict of a single
/// inspection.
pub const HEADER_RESULT: &str = "x-result";

// =============================================================================
// Binary Response
// =============================================================================

/// A binary response body with its out-of-band metadata headers.
///
/// The single-inspection endpoint streams the annotated heatmap as the body
/// and carries the score and verdict in [`HEADER_ANOMALY_SCORE`] and
/// [`HEADER_RESULT`]. Both values are returned verbatim; parsing is the
/// adapter's job.
#[derive(Debug, Clone)]
pub struct BinaryResponse {
    /// Raw response body.
    pub bytes: Bytes,
    /// Value of the anomaly-score header, as transmitted.
    pub score: String,
    /// Value of the result header, as transmitted.
    pub result: String,
}

// =============================================================================
// Gateway
// =============================================================================

/// Single chokepoint for all outbound calls to the inspection service.
///
/// The gateway attaches the bearer token from the session store to every
/// request that has one, constructs the payload encoding the adapter asked
/// for, and maps outcomes into [`ApiError`]. A 401 from any endpoint clears
/// the session store (and thereby notifies session-state subscribers) before
/// the error propagates; the caller still observes a failed call.
///
/// Cheap to clone; clones share the transport and session store.
#[derive(Clone)]
pub struct Gateway {
    builder: reqwest::Client,
    transport: Arc<dyn Transport>,
    base_url: Url,
    session: SessionStore,
}

impl Gateway {
    /// Create a gateway talking to `base_url` over a fresh HTTP client.
    pub fn new(base_url: Url, session: SessionStore) -> Self {
        let client = reqwest::Client::new();
        let transport = Arc::new(HttpTransport::new(client.clone()));
        Self::with_transport(base_url, session, client, transport)
    }

    /// Create a gateway with an explicit transport (tests inject mocks here).
    pub fn with_transport(
        base_url: Url,
        session: SessionStore,
        builder: reqwest::Client,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            builder,
            transport,
            base_url: normalize_base(base_url),
            session,
        }
    }

    /// The session store this gateway attaches tokens from and clears on 401.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Dispatch a request and deserialize the 2xx JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let category = request.category;
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| ApiError::Service {
            status,
            detail: format!("{category}: unexpected response from service ({e})"),
        })
    }

    /// Dispatch a request and return the binary body plus the score/result
    /// sidecar headers.
    pub async fn send_binary(&self, request: ApiRequest) -> Result<BinaryResponse, ApiError> {
        let category = request.category;
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();

        let score = required_header(response.headers(), HEADER_ANOMALY_SCORE, status, category)?;
        let result = required_header(response.headers(), HEADER_RESULT, status, category)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(BinaryResponse {
            bytes,
            score,
            result,
        })
    }

    /// Build the request, attach credentials, execute, and classify the
    /// status. Returns the response only on 2xx.
    async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let ApiRequest {
            method,
            path,
            query,
            payload,
            category,
        } = request;

        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Validation(format!("invalid request path {path:?}: {e}")))?;

        let mut builder = self.builder.request(method, url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        // Absence of a token is not an error; login and register go out bare.
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        builder = match payload {
            Payload::None => builder,
            Payload::Form(fields) => builder.form(&fields),
            Payload::Json(body) => builder.json(&body),
            Payload::MultipartSingle(part) => {
                builder.multipart(multipart::Form::new().part(FILE_FIELD, to_part(part)))
            }
            Payload::MultipartMany(parts) => {
                let mut form = multipart::Form::new();
                for part in parts {
                    form = form.part(FILES_FIELD, to_part(part));
                }
                builder.multipart(form)
            }
        };

        let built = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(method = %built.method(), url = %built.url(), "dispatching request");

        let response = self.transport.execute(built).await?;
        self.classify(response, category).await
    }

    /// Map non-2xx responses to errors. 401 additionally tears down the
    /// session, centrally, so no caller has to handle the redirect itself.
    async fn classify(
        &self,
        response: reqwest::Response,
        category: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("authorization failure from service, clearing session");
            self.session.clear_token();
            return Err(ApiError::Authorization);
        }

        if !status.is_success() {
            let detail = extract_detail(response).await;
            return Err(ApiError::service(status.as_u16(), detail, category));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Ensure the base URL ends with a slash so relative joins append to it.
fn normalize_base(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

fn to_part(part: FilePart) -> multipart::Part {
    multipart::Part::stream(reqwest::Body::from(part.bytes)).file_name(part.filename)
}

fn required_header(
    headers: &HeaderMap,
    name: &str,
    status: u16,
    category: &str,
) -> Result<String, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Service {
            status,
            detail: format!("{category}: response is missing the {name} header"),
        })
}

/// Pull the `detail` field out of an error body, if the service sent one.
async fn extract_detail(response: reqwest::Response) -> Option<String> {
    let body = response.json::<serde_json::Value>().await.ok()?;
    body.get("detail")?.as_str().map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================
