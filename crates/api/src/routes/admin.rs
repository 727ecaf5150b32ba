//! Route definitions for `/admin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET  /users               -> list_users
/// GET  /users/dormant       -> dormant_users
/// POST /users/{id}/status   -> set_user_status
/// POST /users/{id}/delete   -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/dormant", get(admin::dormant_users))
        .route("/users/{id}/status", post(admin::set_user_status))
        .route("/users/{id}/delete", post(admin::delete_user))
}
