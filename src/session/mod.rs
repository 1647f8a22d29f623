//! Session state for the console.
//!
//! The session is the only process-wide mutable state in the client: a single
//! bearer token issued at login, persisted so it survives a console restart,
//! and cleared on logout or whenever the service reports the session invalid.

mod store;

pub use store::{SessionState, SessionStore, TOKEN_FILE_NAME};
