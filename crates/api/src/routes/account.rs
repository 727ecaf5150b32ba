use axum::routing::{get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// ```text
/// GET  /account            -> account_page
/// POST /account/password   -> change_password
/// GET  /users/{id}         -> show_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::account_page))
        .route("/account/password", post(account::change_password))
        .route("/users/{id}", get(account::show_user))
}
