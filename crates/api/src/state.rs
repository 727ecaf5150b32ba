use std::sync::Arc;

use crate::activity::ActivityLogger;
use crate::config::ServerConfig;
use crate::session::SessionStore;
use crate::store::{ActivitySink, BookStore, CredentialStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// User persistence.
    pub users: Arc<dyn CredentialStore>,
    /// Book persistence.
    pub books: Arc<dyn BookStore>,
    /// Read side of the activity log.
    pub activity_log: Arc<dyn ActivitySink>,
    /// Server-side session records keyed by cookie identifier.
    pub sessions: Arc<SessionStore>,
    /// Write side of the activity log (non-blocking).
    pub activity: ActivityLogger,
}

impl AppState {
    /// Assemble state with a fresh, empty session store whose retention
    /// outlasts the configured session timeout.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn CredentialStore>,
        books: Arc<dyn BookStore>,
        activity_log: Arc<dyn ActivitySink>,
        activity: ActivityLogger,
    ) -> Self {
        let sessions = Arc::new(SessionStore::for_timeout(config.session.timeout_secs));
        Self {
            config: Arc::new(config),
            users,
            books,
            activity_log,
            sessions,
            activity,
        }
    }

    pub fn session_timeout_secs(&self) -> i64 {
        self.config.session.timeout_secs
    }
}
