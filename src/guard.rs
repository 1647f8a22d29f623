//! Access guard for the console's views.
//!
//! A pure decision function consulted on every protected-view entry: given
//! the current session state, a view is either shown or the console falls
//! back to the login view. The guard holds no state of its own and performs
//! no I/O; the session store is the single source of truth for "is the
//! console authenticated".

/// The console's views, one per capability area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Objects,
    SingleInspect,
    BatchInspect,
    History,
    Train,
    Login,
    Register,
}

impl View {
    /// All views, in navigation order.
    pub const ALL: [View; 8] = [
        View::Dashboard,
        View::Objects,
        View::SingleInspect,
        View::BatchInspect,
        View::History,
        View::Train,
        View::Login,
        View::Register,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Objects => "objects",
            View::SingleInspect => "inspect",
            View::BatchInspect => "batch",
            View::History => "history",
            View::Train => "train",
            View::Login => "login",
            View::Register => "register",
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
}

/// Decide whether `view` may be entered given the current session state.
///
/// Login and Register are the unauthenticated entry points and always
/// allowed. Train is also reachable without a session — the routing table
/// has always exempted it, and the exemption is kept as-is; the training
/// *endpoint* still rejects unauthenticated calls, so only the view-level
/// gate is open.
pub fn decide(view: View, session_present: bool) -> AccessDecision {
    match view {
        View::Login | View::Register | View::Train => AccessDecision::Allow,
        _ if session_present => AccessDecision::Allow,
        _ => AccessDecision::RedirectToLogin,
    }
}
