//! Inventory page and book mutations.

use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use ink_core::activity::actions;
use ink_core::book::{BookDraft, BookStatus};
use ink_core::error::CoreError;
use ink_core::filter::FilterCriteria;
use ink_core::flash::{messages, Flash};
use ink_core::guard::HOME_PATH;
use ink_core::session::Identity;
use ink_db::models::book::Book;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{parse_id, CsrfForm};
use crate::error::{AppError, AppResult, RedirectOnError};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::{DataResponse, SeeOther};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    /// Id of the book to load into the edit form.
    pub edit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryPage {
    pub user: Identity,
    pub csrf_token: String,
    pub flash: Option<Flash>,
    pub search: Option<String>,
    pub status: Option<BookStatus>,
    pub statuses: &'static [&'static str],
    pub books: Vec<Book>,
    pub editing: Option<Book>,
}

/// Body of `POST /books`. An empty `id` creates, anything else updates.
#[derive(Debug, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub status: String,
    pub csrf_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn inventory(
    State(state): State<AppState>,
    user: AuthUser,
    client: ClientInfo,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<DataResponse<InventoryPage>>> {
    let criteria = FilterCriteria::<BookStatus>::from_raw(
        query.search.as_deref().unwrap_or_default(),
        query.status.as_deref().unwrap_or_default(),
    );

    let editing = match query.edit.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => {
            let id = parse_id(raw).or_redirect(HOME_PATH)?;
            let book = state
                .books
                .find_by_id(id)
                .await?
                .ok_or(CoreError::NotFound { entity: "book", id })
                .or_redirect(HOME_PATH)?;
            Some(book)
        }
    };

    let books = state.books.search(&criteria).await?;

    let (csrf_token, flash) = {
        let mut session = user.session.lock().await;
        (session.issue_csrf_token(), session.take_flash())
    };

    state.activity.record_for(
        &user.identity,
        &client,
        actions::INVENTORY_VIEW,
        json!({
            "search": criteria.search(),
            "status": criteria.value().map(|s| s.as_str()),
            "results": books.len(),
        }),
    );

    Ok(Json(DataResponse {
        data: InventoryPage {
            user: user.identity,
            csrf_token,
            flash,
            search: criteria.search().map(str::to_string),
            status: criteria.value(),
            statuses: BookStatus::ALL,
            books,
            editing,
        },
    }))
}

/// POST /books
pub async fn save_book(
    State(state): State<AppState>,
    user: AuthUser,
    client: ClientInfo,
    Form(form): Form<BookForm>,
) -> AppResult<SeeOther> {
    user.session
        .lock()
        .await
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(HOME_PATH)?;

    let draft = BookDraft::parse(
        &form.title,
        &form.author,
        &form.publisher,
        &form.quantity,
        &form.price,
        &form.status,
    )
    .or_redirect(HOME_PATH)?;

    let raw_id = form.id.trim();
    if raw_id.is_empty() {
        let book = state.books.create(&draft).await.or_redirect(HOME_PATH)?;
        tracing::info!(book_id = book.id, user_id = user.identity.user_id, "Book created");
        state.activity.record_for(
            &user.identity,
            &client,
            actions::BOOK_CREATE,
            json!({ "book_id": book.id, "title": book.title }),
        );
        return Ok(SeeOther::to(HOME_PATH).with_flash(Flash::success(messages::BOOK_CREATED)));
    }

    let id = parse_id(raw_id).or_redirect(HOME_PATH)?;
    if !state.books.update(id, &draft).await.or_redirect(HOME_PATH)? {
        return Err(AppError::from(CoreError::NotFound { entity: "book", id }).redirect_to(HOME_PATH));
    }

    tracing::info!(book_id = id, user_id = user.identity.user_id, "Book updated");
    state.activity.record_for(
        &user.identity,
        &client,
        actions::BOOK_UPDATE,
        json!({ "book_id": id, "title": draft.title }),
    );
    Ok(SeeOther::to(HOME_PATH).with_flash(Flash::success(messages::BOOK_UPDATED)))
}

/// POST /books/{id}/delete
pub async fn delete_book(
    State(state): State<AppState>,
    user: AuthUser,
    client: ClientInfo,
    Path(raw_id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> AppResult<SeeOther> {
    user.session
        .lock()
        .await
        .verify_csrf_token(form.csrf_token.as_deref())
        .or_redirect(HOME_PATH)?;

    let id = parse_id(&raw_id).or_redirect(HOME_PATH)?;
    if !state.books.delete(id).await.or_redirect(HOME_PATH)? {
        return Err(AppError::from(CoreError::NotFound { entity: "book", id }).redirect_to(HOME_PATH));
    }

    tracing::info!(book_id = id, user_id = user.identity.user_id, "Book deleted");
    state.activity.record_for(
        &user.identity,
        &client,
        actions::BOOK_DELETE,
        json!({ "book_id": id }),
    );
    Ok(SeeOther::to(HOME_PATH).with_flash(Flash::success(messages::BOOK_DELETED)))
}
