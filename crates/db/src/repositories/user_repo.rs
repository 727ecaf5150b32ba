//! Repository for the `users` table.

use ink_core::filter::FilterCriteria;
use ink_core::roles::Role;
use ink_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{FilterQuery, FilterTarget};
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, is_active, \
                       last_login_at, created_at, updated_at";

/// Listing target: search over name and email, filter by role.
const LISTING: FilterTarget = FilterTarget {
    table: "users",
    columns: COLUMNS,
    search_columns: ["name", "email"],
    enum_column: "role",
    order_by: "created_at DESC, id DESC",
};

/// Provides persistence operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email fails with a unique violation on `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by (already normalized) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// List users matching `criteria`, newest first.
    pub async fn search(
        pool: &PgPool,
        criteria: &FilterCriteria<Role>,
        active: Option<bool>,
    ) -> Result<Vec<User>, sqlx::Error> {
        FilterQuery::build(&LISTING, criteria, active)
            .fetch_all(pool)
            .await
    }

    /// Set the active flag. Returns `true` if the row exists.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `last_login_at` to now.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users, optionally restricted by role and active flag.
    pub async fn count(
        pool: &PgPool,
        role: Option<Role>,
        active: Option<bool>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM users
             WHERE ($1::TEXT IS NULL OR role = $1)
               AND ($2::BOOLEAN IS NULL OR is_active = $2)",
        )
        .bind(role.map(|r| r.as_str()))
        .bind(active)
        .fetch_one(pool)
        .await
    }

    /// Active users whose last login is older than `days` days, or who never
    /// logged in, oldest first.
    pub async fn list_dormant(pool: &PgPool, days: i32) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE is_active = TRUE
               AND (last_login_at IS NULL
                    OR last_login_at < NOW() - make_interval(days => $1))
             ORDER BY last_login_at ASC NULLS FIRST, id ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(days)
            .fetch_all(pool)
            .await
    }

    /// Whether any admin account exists.
    pub async fn admin_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await
    }
}
