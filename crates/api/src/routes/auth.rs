//! Public authentication routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// GET  /login     -> login_page
/// POST /login     -> login
/// GET  /register  -> register_page
/// POST /register  -> register
/// POST /logout    -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}
