//! The signed-in user's own account, and user profiles.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use ink_core::activity::actions;
use ink_core::error::CoreError;
use ink_core::flash::{messages, Flash};
use ink_core::flow::Redirect;
use ink_core::guard::{self, HOME_PATH, LOGIN_PATH};
use ink_db::models::activity::ActivityLog;
use ink_db::models::user::UserResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{parse_id, ACCOUNT_PATH};
use crate::auth::service;
use crate::error::{AppError, AppResult, RedirectOnError};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::{DataResponse, SeeOther};
use crate::state::AppState;

/// Number of recent activity entries shown on the account page.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct AccountPage {
    pub user: UserResponse,
    pub csrf_token: String,
    pub flash: Option<Flash>,
    pub recent_activity: Vec<ActivityLog>,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub csrf_token: Option<String>,
}

/// GET /account
///
/// A session whose user row has disappeared is ended.
pub async fn account_page(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let user_id = user.identity.user_id;
    let Some(record) = state.users.find_by_id(user_id).await? else {
        tracing::warn!(user_id, "Session refers to a missing user, ending it");
        user.session.lock().await.destroy();
        return Ok(SeeOther::to(LOGIN_PATH)
            .with_flash(Flash::info(messages::LOGIN_REQUIRED))
            .into_response());
    };

    let recent_activity = state
        .activity_log
        .recent_for_actor(user_id, RECENT_ACTIVITY_LIMIT)
        .await?;

    let (csrf_token, flash) = {
        let mut session = user.session.lock().await;
        (session.issue_csrf_token(), session.take_flash())
    };

    Ok(Json(DataResponse {
        data: AccountPage {
            user: record.into(),
            csrf_token,
            flash,
            recent_activity,
        },
    })
    .into_response())
}

/// POST /account/password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    client: ClientInfo,
    Form(form): Form<ChangePasswordForm>,
) -> AppResult<SeeOther> {
    let mut session = user.session.lock().await;
    session
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(ACCOUNT_PATH)?;

    service::change_password(
        state.users.as_ref(),
        &mut session,
        &user.identity,
        &form.current_password,
        &form.new_password,
        &form.confirm_password,
    )
    .await
    .or_redirect(ACCOUNT_PATH)?;

    state
        .activity
        .record_for(&user.identity, &client, actions::PASSWORD_CHANGE, json!({}));
    Ok(SeeOther::to(ACCOUNT_PATH).with_flash(Flash::success(messages::PASSWORD_CHANGED)))
}

/// GET /users/{id}
///
/// Users may view their own profile; admins may view any.
pub async fn show_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let id = parse_id(&raw_id).or_redirect(HOME_PATH)?;
    if !guard::can_access_user(&user.identity, id) {
        tracing::warn!(user_id = user.identity.user_id, target_id = id, "Profile access denied");
        return Err(AppError::Redirect(
            Redirect::to(HOME_PATH).with_flash(Flash::danger(messages::PERMISSION_DENIED)),
        ));
    }

    let record = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })
        .or_redirect(HOME_PATH)?;

    Ok(Json(DataResponse {
        data: record.into(),
    }))
}
