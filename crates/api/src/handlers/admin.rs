//! Admin-only user management.

use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use ink_core::activity::actions;
use ink_core::error::CoreError;
use ink_core::filter::FilterCriteria;
use ink_core::flash::{messages, Flash};
use ink_core::roles::Role;
use ink_core::types::DbId;
use ink_db::models::user::UserResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{parse_flag, parse_id, CsrfForm, ADMIN_USERS_PATH};
use crate::error::{AppError, AppResult, RedirectOnError};
use crate::middleware::client::ClientInfo;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, SeeOther};
use crate::state::AppState;

/// Look-back window for the dormant account report when none is given.
pub const DEFAULT_DORMANT_DAYS: i32 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    /// `1`/`true` or `0`/`false`; anything else is ignored.
    pub active: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserTotals {
    pub total: i64,
    pub admins: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub csrf_token: String,
    pub flash: Option<Flash>,
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub roles: &'static [&'static str],
    pub totals: UserTotals,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DormantQuery {
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DormantPage {
    pub days: i32,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub active: String,
    pub csrf_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<UsersQuery>,
) -> AppResult<Json<DataResponse<UsersPage>>> {
    let criteria = FilterCriteria::<Role>::from_raw(
        query.search.as_deref().unwrap_or_default(),
        query.role.as_deref().unwrap_or_default(),
    );
    let active = query.active.as_deref().and_then(parse_flag);

    let users = state.users.search(&criteria, active).await?;
    let totals = UserTotals {
        total: state.users.count(None, None).await?,
        admins: state.users.count(Some(Role::Admin), None).await?,
        active: state.users.count(None, Some(true)).await?,
    };

    let (csrf_token, flash) = {
        let mut session = admin.session.lock().await;
        (session.issue_csrf_token(), session.take_flash())
    };

    Ok(Json(DataResponse {
        data: UsersPage {
            csrf_token,
            flash,
            search: criteria.search().map(str::to_string),
            role: criteria.value(),
            active,
            roles: Role::ALL,
            totals,
            users: users.into_iter().map(UserResponse::from).collect(),
        },
    }))
}

/// GET /admin/users/dormant
///
/// Accounts with no login in the last `days` days, never-logged-in first.
pub async fn dormant_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DormantQuery>,
) -> AppResult<Json<DataResponse<DormantPage>>> {
    let days = query
        .days
        .as_deref()
        .and_then(|d| d.trim().parse::<i32>().ok())
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_DORMANT_DAYS);

    let users = state.users.list_dormant(days).await?;
    Ok(Json(DataResponse {
        data: DormantPage {
            days,
            users: users.into_iter().map(UserResponse::from).collect(),
        },
    }))
}

/// POST /admin/users/{id}/status
pub async fn set_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(raw_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> AppResult<SeeOther> {
    admin
        .session
        .lock()
        .await
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(ADMIN_USERS_PATH)?;

    let id = target_id(&raw_id, admin.identity.user_id)?;
    let active = parse_flag(&form.active)
        .ok_or_else(|| AppError::BadRequest("Invalid status value.".into()))
        .or_redirect(ADMIN_USERS_PATH)?;

    if !state
        .users
        .set_active(id, active)
        .await
        .or_redirect(ADMIN_USERS_PATH)?
    {
        return Err(user_not_found(id));
    }

    tracing::info!(admin_id = admin.identity.user_id, user_id = id, active, "User status changed");
    state.activity.record_for(
        &admin.identity,
        &client,
        actions::USER_STATUS_CHANGE,
        json!({ "user_id": id, "active": active }),
    );
    Ok(SeeOther::to(ADMIN_USERS_PATH).with_flash(Flash::success(messages::USER_UPDATED)))
}

/// POST /admin/users/{id}/delete
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(raw_id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> AppResult<SeeOther> {
    admin
        .session
        .lock()
        .await
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(ADMIN_USERS_PATH)?;

    let id = target_id(&raw_id, admin.identity.user_id)?;
    if !state.users.delete(id).await.or_redirect(ADMIN_USERS_PATH)? {
        return Err(user_not_found(id));
    }

    tracing::info!(admin_id = admin.identity.user_id, user_id = id, "User deleted");
    state.activity.record_for(
        &admin.identity,
        &client,
        actions::USER_DELETE,
        json!({ "user_id": id }),
    );
    Ok(SeeOther::to(ADMIN_USERS_PATH).with_flash(Flash::success(messages::USER_DELETED)))
}

/// Parse the target user id. Admins cannot act on their own account here.
fn target_id(raw: &str, admin_id: DbId) -> AppResult<DbId> {
    let id = parse_id(raw).or_redirect(ADMIN_USERS_PATH)?;
    if id == admin_id {
        return Err(AppError::BadRequest(messages::CANNOT_MODIFY_SELF.into()))
            .or_redirect(ADMIN_USERS_PATH);
    }
    Ok(id)
}

fn user_not_found(id: DbId) -> AppError {
    AppError::from(CoreError::NotFound { entity: "user", id }).redirect_to(ADMIN_USERS_PATH)
}
