//! # Inspect Console
//!
//! Client library for a remote visual-inspection service: upload images of
//! physical parts, get back an anomaly score, a normal/defect verdict, and
//! an annotated heatmap, and manage the per-object training and history
//! around that.
//!
//! The library owns the session and wire concerns; rendering is the
//! binary's job. It is organized into a few modules:
//!
//! - [`session`] - the process-wide session token, persisted across restarts,
//!   with a watch channel signalling forced sign-out
//! - [`client`] - the request gateway: payload encodings, bearer credential
//!   attachment, response interpretation, and central 401 handling
//! - [`api`] - one typed adapter per capability area (auth, objects,
//!   analytics, inspection, training)
//! - [`guard`] - the pure view-access decision function
//! - [`config`] - CLI and configuration types
//! - [`error`] - the error taxonomy shared by all of the above
//!
//! ## Example
//!
//! ```rust,no_run
//! use inspect_console::{AuthApi, Gateway, ObjectsApi, SessionStore};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), inspect_console::ApiError> {
//!     let session = SessionStore::at_default_path();
//!     let gateway = Gateway::new(Url::parse("http://127.0.0.1:8000").unwrap(), session);
//!
//!     AuthApi::new(gateway.clone()).login("op1", "pw").await?;
//!     for object in ObjectsApi::new(gateway).list().await? {
//!         println!("{}  {}", object.id, object.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;

// Re-export commonly used types
pub use api::types::{
    AnalyticsSummary, BatchItem, Classification, HistoryRecord, InspectionObject, TrainingOutcome,
};
pub use api::{AnalyticsApi, AuthApi, InspectionApi, ObjectsApi, SingleInspection, TrainingApi};
pub use client::{
    ApiRequest, BinaryResponse, FilePart, Gateway, HttpTransport, Payload, Transport,
    FILES_FIELD, FILE_FIELD, HEADER_ANOMALY_SCORE, HEADER_RESULT,
};
pub use config::{Cli, Command, ObjectsCommand, DEFAULT_API_URL};
pub use error::ApiError;
pub use guard::{decide, AccessDecision, View};
pub use session::{SessionState, SessionStore, TOKEN_FILE_NAME};
