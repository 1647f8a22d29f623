use bytes::Bytes;
use reqwest::Method;

/// Multipart field name for a single-file upload.
pub const FILE_FIELD: &str = "file";

/// Multipart field name repeated once per file in batch uploads.
pub const FILES_FIELD: &str = "files";

/// One file destined for a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// File name reported to the service (used as the inspection key).
    pub filename: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl FilePart {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Body encoding for an outbound request.
///
/// The service speaks four distinct payload shapes; each adapter picks
/// exactly one per operation.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body (GETs and query-parameter-only POSTs).
    None,
    /// `application/x-www-form-urlencoded` key/value pairs (login only).
    Form(Vec<(String, String)>),
    /// JSON body.
    Json(serde_json::Value),
    /// One file under the `file` field.
    MultipartSingle(FilePart),
    /// N files under the repeated `files` field.
    MultipartMany(Vec<FilePart>),
}

/// Description of one call to the inspection service.
///
/// `category` is the generic failure message used when the service rejects
/// the request without a `detail` of its own.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the service base URL, e.g. `/objects`.
    pub path: String,
    /// Query parameters, appended url-encoded.
    pub query: Vec<(String, String)>,
    pub payload: Payload,
    pub category: &'static str,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>, category: &'static str) -> Self {
        Self::new(Method::GET, path, category)
    }

    pub fn post(path: impl Into<String>, category: &'static str) -> Self {
        Self::new(Method::POST, path, category)
    }

    fn new(method: Method, path: impl Into<String>, category: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            payload: Payload::None,
            category,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}
