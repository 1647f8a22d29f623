//! Token storage and the sign-in/sign-out signal.
//!
//! The store holds the current bearer token in memory and mirrors it to a
//! token file at a fixed, well-known path so the session survives restarts.
//! The in-memory value is authoritative: persistence failures are logged and
//! never propagate, keeping `token()` infallible.
//!
//! Write access is deliberately narrow. The authentication adapter is the
//! only caller that sets a token; the gateway's 401 interceptor and explicit
//! logout only ever clear it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use directories::ProjectDirs;
use tokio::sync::watch;
use tracing::{debug, warn};

/// File name of the persisted token, under the platform config directory.
pub const TOKEN_FILE_NAME: &str = "session-token";

// =============================================================================
// Session State
// =============================================================================

/// Whether the console currently holds a session token.
///
/// Published on a watch channel so whatever owns navigation can react to a
/// forced sign-out without the gateway knowing anything about views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A token is present (it may still be rejected by the service).
    SignedIn,
    /// No token is present; protected views should redirect to login.
    SignedOut,
}

// =============================================================================
// Session Store
// =============================================================================

struct Inner {
    token: RwLock<Option<String>>,
    /// Token file location; `None` disables persistence (tests, `--no-store`).
    path: Option<PathBuf>,
    state_tx: watch::Sender<SessionState>,
}

/// Process-wide holder of the session token.
///
/// Cheap to clone; all clones share the same token and state channel.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a store persisting to `path`, loading any token already there.
    pub fn new(path: PathBuf) -> Self {
        let token = load_token(&path);
        Self::build(token, Some(path))
    }

    /// Create a store that keeps the token in memory only.
    pub fn in_memory() -> Self {
        Self::build(None, None)
    }

    /// Create a store at the platform default location
    /// (e.g. `~/.config/inspect-console/session-token` on Linux).
    ///
    /// Falls back to an in-memory store when no home directory can be
    /// determined.
    pub fn at_default_path() -> Self {
        match default_token_path() {
            Some(path) => Self::new(path),
            None => {
                warn!("no config directory available, session will not survive restarts");
                Self::in_memory()
            }
        }
    }

    fn build(token: Option<String>, path: Option<PathBuf>) -> Self {
        let initial = if token.is_some() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        };
        let (state_tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                token: RwLock::new(token),
                path,
                state_tx,
            }),
        }
    }

    /// Replace the stored token and persist it.
    ///
    /// Any prior token is fully replaced; there is never more than one live
    /// token.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        {
            let mut guard = self
                .inner
                .token
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = Some(token.clone());
        }
        if let Some(path) = &self.inner.path {
            persist_token(path, &token);
        }
        self.transition(SessionState::SignedIn);
    }

    /// Current token, if any. Never fails.
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True if a token is currently held.
    pub fn is_signed_in(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Remove the token from memory and durable storage. Idempotent.
    pub fn clear_token(&self) {
        {
            let mut guard = self
                .inner
                .token
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = None;
        }
        if let Some(path) = &self.inner.path {
            remove_token(path);
        }
        self.transition(SessionState::SignedOut);
    }

    /// Subscribe to sign-in/sign-out transitions.
    ///
    /// Subscribers are only woken on an actual state change, so concurrent
    /// authorization failures produce a single sign-out notification.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// Current published session state.
    pub fn state(&self) -> SessionState {
        *self.inner.state_tx.borrow()
    }

    fn transition(&self, next: SessionState) {
        self.inner.state_tx.send_if_modified(|state| {
            if *state != next {
                *state = next;
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("signed_in", &self.is_signed_in())
            .field("path", &self.inner.path)
            .finish()
    }
}

// =============================================================================
// Persistence Helpers
// =============================================================================

/// Default token file location under the platform config directory.
pub fn default_token_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "inspect-console")
        .map(|dirs| dirs.config_dir().join(TOKEN_FILE_NAME))
}

fn load_token(path: &PathBuf) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim().to_string();
            if token.is_empty() {
                None
            } else {
                debug!(path = %path.display(), "restored session token");
                Some(token)
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), "failed to read token file: {}", e);
            None
        }
    }
}

fn persist_token(path: &PathBuf, token: &str) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(path = %path.display(), "failed to create token directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, token) {
        warn!(path = %path.display(), "failed to persist token: {}", e);
    }
}

fn remove_token(path: &PathBuf) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "failed to remove token file: {}", e),
    }
}

// =============================================================================
// Tests
// =============================================================================
