//! Book entity model and DTOs.

use ink_core::book::BookStatus;
use ink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `books` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub quantity: i32,
    pub price: f64,
    /// Unknown stored values fall back to [`BookStatus::Comum`].
    #[sqlx(try_from = "String")]
    pub status: BookStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
