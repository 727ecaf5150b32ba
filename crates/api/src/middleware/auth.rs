//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use ink_core::flow::Flow;
use ink_core::guard::{self, AccessState};
use ink_core::session::Identity;

use crate::error::AppError;
use crate::session::SessionHandle;
use crate::state::AppState;

/// The authenticated user behind the current request.
///
/// Extracting it runs the access guard: a valid session slides its timeout
/// forward, an expired one is destroyed, and either failure ends the request
/// with a redirect to the login page.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.identity.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Clone)]
pub struct AuthUser {
    pub identity: Identity,
    /// The session the identity was read from, for CSRF checks and flashes.
    pub session: SessionHandle,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let handle = SessionHandle::from_request_parts(parts, state).await?;
        let timeout = state.session_timeout_secs();
        let now = Utc::now();

        let mut session = handle.lock().await;
        if guard::classify(&session, now, timeout) == AccessState::Expired {
            tracing::info!(
                user_id = session.identity().map(|i| i.user_id),
                "Session expired"
            );
        }

        match guard::require_login(&mut session, now, timeout) {
            Flow::Continue(identity) => {
                drop(session);
                Ok(AuthUser {
                    identity,
                    session: handle,
                })
            }
            Flow::Redirect(redirect) => Err(AppError::Redirect(redirect)),
        }
    }
}
