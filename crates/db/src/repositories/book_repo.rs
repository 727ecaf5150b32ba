//! Repository for the `books` table.

use ink_core::book::{BookDraft, BookStatus};
use ink_core::filter::FilterCriteria;
use ink_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{FilterQuery, FilterTarget};
use crate::models::book::Book;

const COLUMNS: &str = "id, title, author, publisher, quantity, price, status, \
                       created_at, updated_at";

const LISTING: FilterTarget = FilterTarget {
    table: "books",
    columns: COLUMNS,
    search_columns: ["title", "author"],
    enum_column: "status",
    order_by: "id DESC",
};

pub struct BookRepo;

impl BookRepo {
    pub async fn create(pool: &PgPool, draft: &BookDraft) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (title, author, publisher, quantity, price, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&draft.title)
            .bind(&draft.author)
            .bind(&draft.publisher)
            .bind(draft.quantity)
            .bind(draft.price)
            .bind(draft.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every editable field. Returns `false` if no such book exists.
    pub async fn update(pool: &PgPool, id: DbId, draft: &BookDraft) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE books SET
                title = $2, author = $3, publisher = $4,
                quantity = $5, price = $6, status = $7
             WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.publisher)
        .bind(draft.quantity)
        .bind(draft.price)
        .bind(draft.status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List books matching `criteria`, highest id first.
    pub async fn search(
        pool: &PgPool,
        criteria: &FilterCriteria<BookStatus>,
    ) -> Result<Vec<Book>, sqlx::Error> {
        FilterQuery::build(&LISTING, criteria, None)
            .fetch_all(pool)
            .await
    }
}
