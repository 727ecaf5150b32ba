use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use ink_core::csrf::is_well_formed;
use ink_core::session::{Lifecycle, Session, SessionData};
use tokio::sync::{Mutex, MutexGuard};

use super::cookie;
use crate::error::AppError;
use crate::response::PendingFlash;
use crate::state::AppState;

/// Request-scoped access to the current client's [`Session`].
///
/// Inserted into request extensions by [`session_layer`]; handlers reach it
/// through this extractor or through the auth extractors.
#[derive(Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }
}

impl FromRequestParts<AppState> for SessionHandle {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| AppError::InternalError("Session layer is not installed".into()))
    }
}

/// Load the session named by the request cookie, run the handler, then
/// persist whatever the handler did to it.
///
/// Only identifiers the store already knows are accepted, so a client cannot
/// choose its own session id.
pub async fn session_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = cookie::read(request.headers(), &state.config.session.cookie_name)
        .filter(|id| is_well_formed(id));

    let mut known_id = None;
    let mut data = SessionData::default();
    if let Some(id) = presented {
        if let Some(stored) = state.sessions.load(&id).await {
            data = stored;
            known_id = Some(id);
        }
    }

    let handle = SessionHandle::new(Session::from_data(data));
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    let mut session = handle.lock().await;
    if let Some(PendingFlash(flash)) = response.extensions_mut().remove::<PendingFlash>() {
        session.set_flash(flash);
    }
    let (data, lifecycle) = session.clone().into_parts();
    drop(session);

    if let Some(set_cookie) = persist(&state, known_id, data, lifecycle).await {
        match HeaderValue::from_str(&set_cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie value"),
        }
    }

    response
}

/// Write session data back to the store. Returns the `Set-Cookie` value to
/// send, if the client's cookie must change.
async fn persist(
    state: &AppState,
    known_id: Option<String>,
    data: SessionData,
    lifecycle: Lifecycle,
) -> Option<String> {
    let config = &state.config.session;

    if lifecycle.rotates_identifier() {
        if let Some(old) = &known_id {
            state.sessions.remove(old).await;
        }
    }

    match (lifecycle, known_id) {
        (Lifecycle::Unchanged, _) => None,
        (Lifecycle::Modified, Some(id)) if data.is_empty() => {
            state.sessions.remove(&id).await;
            Some(cookie::expire(config))
        }
        (Lifecycle::Modified, Some(id)) => {
            state.sessions.save(&id, data).await;
            None
        }
        (Lifecycle::Modified, None) if data.is_empty() => None,
        (Lifecycle::Destroyed, known) if data.is_empty() => {
            known.map(|_| cookie::expire(config))
        }
        (Lifecycle::Modified | Lifecycle::Renewed | Lifecycle::Destroyed, _) => {
            let id = state.sessions.insert(data).await;
            tracing::debug!(lifecycle = ?lifecycle, "Issued session identifier");
            Some(cookie::issue(config, &id))
        }
    }
}
