use axum::routing::{get, post};
use axum::Router;

use crate::handlers::books;
use crate::state::AppState;

/// ```text
/// GET  /                    -> inventory
/// POST /books               -> save_book
/// POST /books/{id}/delete   -> delete_book
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::inventory))
        .route("/books", post(books::save_book))
        .route("/books/{id}/delete", post(books::delete_book))
}
