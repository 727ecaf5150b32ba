//! Handlers for login, registration and logout.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use chrono::Utc;
use ink_core::activity::{actions, ActivityEntry};
use ink_core::flash::{messages, Flash};
use ink_core::guard::{self, AccessState, HOME_PATH, LOGIN_PATH};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::REGISTER_PATH;
use crate::auth::service;
use crate::error::{AppResult, RedirectOnError};
use crate::middleware::client::ClientInfo;
use crate::response::{DataResponse, SeeOther};
use crate::session::SessionHandle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Page model for the login and registration forms.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub csrf_token: String,
    pub flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub csrf_token: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub csrf_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /login
///
/// Clients with a valid session go straight to the inventory.
pub async fn login_page(State(state): State<AppState>, handle: SessionHandle) -> Response {
    let mut session = handle.lock().await;
    if guard::classify(&session, Utc::now(), state.session_timeout_secs()) == AccessState::Valid {
        return SeeOther::to(HOME_PATH).into_response();
    }
    auth_page(&mut session).into_response()
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    handle: SessionHandle,
    client: ClientInfo,
    Form(form): Form<LoginForm>,
) -> AppResult<SeeOther> {
    let mut session = handle.lock().await;
    session
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(LOGIN_PATH)?;

    let identity = service::login(state.users.as_ref(), &mut session, &form.email, &form.password)
        .await
        .or_redirect(LOGIN_PATH)?;

    state
        .activity
        .record_for(&identity, &client, actions::LOGIN, json!({}));
    Ok(SeeOther::to(HOME_PATH))
}

/// GET /register
pub async fn register_page(handle: SessionHandle) -> Response {
    let mut session = handle.lock().await;
    auth_page(&mut session).into_response()
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    handle: SessionHandle,
    client: ClientInfo,
    Form(form): Form<RegisterForm>,
) -> AppResult<SeeOther> {
    handle
        .lock()
        .await
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(REGISTER_PATH)?;

    let user = service::register(
        state.users.as_ref(),
        &form.name,
        &form.email,
        &form.password,
        &form.confirm_password,
    )
    .await
    .or_redirect(REGISTER_PATH)?;

    state.activity.record(
        ActivityEntry::new(actions::REGISTER)
            .with_actor(user.id, user.name.clone())
            .with_client(client.ip_address, client.user_agent),
    );
    Ok(SeeOther::to(LOGIN_PATH).with_flash(Flash::success(messages::ACCOUNT_CREATED)))
}

/// POST /logout
///
/// Always succeeds, with or without a session.
pub async fn logout(
    State(state): State<AppState>,
    handle: SessionHandle,
    client: ClientInfo,
) -> SeeOther {
    let mut session = handle.lock().await;
    if let Some(identity) = service::logout(&mut session) {
        tracing::info!(user_id = identity.user_id, "User logged out");
        state
            .activity
            .record_for(&identity, &client, actions::LOGOUT, json!({}));
    }
    SeeOther::to(LOGIN_PATH).with_flash(Flash::success(messages::LOGGED_OUT))
}

fn auth_page(session: &mut ink_core::session::Session) -> Json<DataResponse<AuthPage>> {
    Json(DataResponse {
        data: AuthPage {
            csrf_token: session.issue_csrf_token(),
            flash: session.take_flash(),
        },
    })
}
