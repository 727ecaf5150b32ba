pub mod account;
pub mod admin;
pub mod auth;
pub mod books;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the session-backed route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                           login form, submit (public)
/// /register                        registration form, submit (public)
/// /logout                          end session (POST)
///
/// /                                inventory listing (auth required)
/// /books                           create or update a book (POST)
/// /books/{id}/delete               delete a book (POST)
///
/// /account                         own account and recent activity
/// /account/password                change password (POST)
/// /users/{id}                      profile (self or admin)
///
/// /admin/users                     list with filters (admin only)
/// /admin/users/dormant             accounts without recent logins
/// /admin/users/{id}/status         activate, deactivate (POST)
/// /admin/users/{id}/delete         delete (POST)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(books::router())
        .merge(account::router())
        .nest("/admin", admin::router())
}
