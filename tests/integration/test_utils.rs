//! Test utilities for integration tests.
//!
//! Provides a mock inspection service that mimics the real backend's wire
//! contract: form login, bearer-guarded endpoints, multipart uploads, the
//! binary-plus-headers single inspection response, and both historical
//! response shapes for batch/history.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use inspect_console::{Gateway, SessionStore};

/// Token issued by the mock login endpoint.
pub const MOCK_TOKEN: &str = "abc123";

/// The one accepted credential pair.
pub const MOCK_USER: &str = "op1";
pub const MOCK_PASSWORD: &str = "pw";

// =============================================================================
// Mock Service State
// =============================================================================

/// One request as seen by the mock service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub auth: Option<String>,
}

pub struct MockState {
    /// Force 401 on every guarded endpoint, regardless of token.
    pub reject_all: AtomicBool,

    /// When true, batch/history answer wrapped (`{results}`/`{history}`)
    /// with the `score` field spelling; when false, bare arrays with the
    /// `anomaly_score` spelling. Covers both observed service revisions.
    pub wrap_responses: AtomicBool,

    /// Sidecar header values for single inspection.
    pub inspect_score: Mutex<String>,
    pub inspect_result: Mutex<String>,

    /// Annotated heatmap returned by single inspection.
    pub heatmap: Vec<u8>,

    pub analytics: Mutex<Value>,
    pub history_rows: Mutex<Vec<(String, f64, String, String)>>,

    objects: Mutex<Vec<(String, String)>>,
    next_object: AtomicUsize,

    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            reject_all: AtomicBool::new(false),
            wrap_responses: AtomicBool::new(true),
            inspect_score: Mutex::new("0.8732".to_string()),
            inspect_result: Mutex::new("DEFECT".to_string()),
            heatmap: test_png(64, 48),
            analytics: Mutex::new(json!({
                "total": 4,
                "normal": 3,
                "defect": 1,
                "defect_rate": 25.0
            })),
            history_rows: Mutex::new(vec![
                (
                    "part-01.png".to_string(),
                    0.12,
                    "NORMAL".to_string(),
                    "2026-08-24T09:00:00Z".to_string(),
                ),
                (
                    "part-02.png".to_string(),
                    1.31,
                    "DEFECT".to_string(),
                    "2026-08-24T09:05:00Z".to_string(),
                ),
            ]),
            objects: Mutex::new(Vec::new()),
            next_object: AtomicUsize::new(1),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockState {
    fn record(&self, method: &str, path: impl Into<String>, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.into(),
            auth,
        });
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
        if self.reject_all.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        let expected = format!("Bearer {MOCK_TOKEN}");
        match headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            Some(value) if value == expected => Ok(()),
            _ => Err(unauthorized()),
        }
    }

    /// All recorded requests, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Auth header of the most recent request.
    pub fn last_auth(&self) -> Option<String> {
        self.requests.lock().unwrap().last().and_then(|r| r.auth.clone())
    }

    /// Number of requests that reached `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Invalid token"})),
    )
}

// =============================================================================
// Mock Service
// =============================================================================

pub struct MockService {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockService {
    /// Bind the mock service to an ephemeral loopback port.
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock service");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock service");
        });
        Self { addr, state }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock url")
    }

    /// Gateway with a fresh in-memory session.
    pub fn gateway(&self) -> Gateway {
        self.gateway_with(SessionStore::in_memory())
    }

    pub fn gateway_with(&self, session: SessionStore) -> Gateway {
        Gateway::new(self.url(), session)
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/objects", post(create_object).get(list_objects))
        .route("/objects/{id}/analytics", get(analytics))
        .route("/objects/{id}/inspect", post(inspect))
        .route("/objects/{id}/inspect-batch", post(inspect_batch))
        .route("/objects/{id}/history", get(history))
        .route("/objects/{id}/train", post(train))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<Credentials>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("POST", "/login", &headers);
    if form.username == MOCK_USER && form.password == MOCK_PASSWORD {
        Ok(Json(
            json!({"access_token": MOCK_TOKEN, "token_type": "bearer"}),
        ))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        ))
    }
}

async fn register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Credentials>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("POST", "/register", &headers);
    if body.username == "taken" {
        return Err((StatusCode::BAD_REQUEST, Json(json!({"detail": "User exists"}))));
    }
    let _ = body.password;
    Ok(Json(json!({"message": "Registered"})))
}

#[derive(Deserialize)]
struct CreateObjectParams {
    name: String,
}

async fn create_object(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<CreateObjectParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("POST", "/objects", &headers);
    state.authorize(&headers)?;

    let n = state.next_object.fetch_add(1, Ordering::SeqCst);
    let id = format!("OBJ-{n}");
    state
        .objects
        .lock()
        .unwrap()
        .push((id.clone(), params.name));

    // The live backend echoes object_id + owner, not id + name.
    Ok(Json(json!({"object_id": id, "owner": MOCK_USER})))
}

async fn list_objects(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("GET", "/objects", &headers);
    state.authorize(&headers)?;

    let objects: Vec<Value> = state
        .objects
        .lock()
        .unwrap()
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    Ok(Json(Value::Array(objects)))
}

async fn analytics(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("GET", format!("/objects/{id}/analytics"), &headers);
    state.authorize(&headers)?;
    Ok(Json(state.analytics.lock().unwrap().clone()))
}

async fn inspect(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    state.record("POST", format!("/objects/{id}/inspect"), &headers);
    state.authorize(&headers)?;

    let mut saw_file = false;
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            saw_file = true;
            let _ = field.bytes().await.unwrap();
        }
    }
    if !saw_file {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "file field missing"})),
        ));
    }

    let score = state.inspect_score.lock().unwrap().clone();
    let result = state.inspect_result.lock().unwrap().clone();
    Ok((
        [
            (header::CONTENT_TYPE.as_str(), "image/png".to_string()),
            ("x-anomaly-score", score),
            ("x-result", result),
        ],
        state.heatmap.clone(),
    ))
}

async fn inspect_batch(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("POST", format!("/objects/{id}/inspect-batch"), &headers);
    state.authorize(&headers)?;

    let wrapped = state.wrap_responses.load(Ordering::SeqCst);
    let score_key = if wrapped { "score" } else { "anomaly_score" };

    let mut items = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("files") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let _ = field.bytes().await.unwrap();

        let defect = filename.contains("defect");
        items.push(json!({
            "filename": filename,
            score_key: if defect { 1.5 } else { 0.1 },
            "result": if defect { "DEFECT" } else { "NORMAL" },
        }));
    }

    if wrapped {
        Ok(Json(json!({
            "object_id": id,
            "batch_size": items.len(),
            "results": items,
        })))
    } else {
        Ok(Json(Value::Array(items)))
    }
}

async fn history(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("GET", format!("/objects/{id}/history"), &headers);
    state.authorize(&headers)?;

    let wrapped = state.wrap_responses.load(Ordering::SeqCst);
    let score_key = if wrapped { "score" } else { "anomaly_score" };

    let rows: Vec<Value> = state
        .history_rows
        .lock()
        .unwrap()
        .iter()
        .map(|(filename, score, result, timestamp)| {
            json!({
                "filename": filename,
                score_key: score,
                "result": result,
                "timestamp": timestamp,
            })
        })
        .collect();

    if wrapped {
        Ok(Json(json!({"history": rows})))
    } else {
        Ok(Json(Value::Array(rows)))
    }
}

async fn train(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record("POST", format!("/objects/{id}/train"), &headers);
    state.authorize(&headers)?;

    let mut count = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("files") {
            let _ = field.bytes().await.unwrap();
            count += 1;
        }
    }
    Ok(Json(json!({"status": "trained", "images_used": count})))
}

// =============================================================================
// Fixtures
// =============================================================================

/// Create a small PNG with a gradient pattern.
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode test png");
    buf.into_inner()
}

/// Check that data decodes as a PNG.
pub fn is_valid_png(data: &[u8]) -> bool {
    image::load_from_memory_with_format(data, image::ImageFormat::Png).is_ok()
}
