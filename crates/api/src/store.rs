//! Persistence seams used by the handlers.
//!
//! Handlers depend on these traits rather than on a pool, so the HTTP layer
//! can be exercised against any backing store. [`PgStore`] is the production
//! implementation; it delegates to the `ink_db` repositories.

use async_trait::async_trait;
use ink_core::activity::ActivityEntry;
use ink_core::book::{BookDraft, BookStatus};
use ink_core::filter::FilterCriteria;
use ink_core::roles::Role;
use ink_core::types::DbId;
use ink_db::models::activity::ActivityLog;
use ink_db::models::book::Book;
use ink_db::models::user::{CreateUser, User};
use ink_db::repositories::{ActivityRepo, BookRepo, UserRepo};
use ink_db::DbPool;

/// Lookup and mutation of user records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;
    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error>;
    async fn record_login(&self, id: DbId) -> Result<(), sqlx::Error>;
    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error>;
    async fn search(
        &self,
        criteria: &FilterCriteria<Role>,
        active: Option<bool>,
    ) -> Result<Vec<User>, sqlx::Error>;
    async fn set_active(&self, id: DbId, active: bool) -> Result<bool, sqlx::Error>;
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
    async fn count(&self, role: Option<Role>, active: Option<bool>) -> Result<i64, sqlx::Error>;
    async fn list_dormant(&self, days: i32) -> Result<Vec<User>, sqlx::Error>;
    async fn admin_exists(&self) -> Result<bool, sqlx::Error>;
}

/// Book records.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, draft: &BookDraft) -> Result<Book, sqlx::Error>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, sqlx::Error>;
    async fn update(&self, id: DbId, draft: &BookDraft) -> Result<bool, sqlx::Error>;
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
    async fn search(&self, criteria: &FilterCriteria<BookStatus>) -> Result<Vec<Book>, sqlx::Error>;
}

/// Append-only activity log.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), sqlx::Error>;
    async fn recent_for_actor(
        &self,
        actor_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        ink_db::health_check(&self.pool).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_email(&self.pool, email).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        UserRepo::email_exists(&self.pool, email).await
    }

    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        UserRepo::create(&self.pool, input).await
    }

    async fn record_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        UserRepo::record_login(&self.pool, id).await
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        UserRepo::update_password(&self.pool, id, password_hash).await
    }

    async fn search(
        &self,
        criteria: &FilterCriteria<Role>,
        active: Option<bool>,
    ) -> Result<Vec<User>, sqlx::Error> {
        UserRepo::search(&self.pool, criteria, active).await
    }

    async fn set_active(&self, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        UserRepo::set_active(&self.pool, id, active).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        UserRepo::delete(&self.pool, id).await
    }

    async fn count(&self, role: Option<Role>, active: Option<bool>) -> Result<i64, sqlx::Error> {
        UserRepo::count(&self.pool, role, active).await
    }

    async fn list_dormant(&self, days: i32) -> Result<Vec<User>, sqlx::Error> {
        UserRepo::list_dormant(&self.pool, days).await
    }

    async fn admin_exists(&self) -> Result<bool, sqlx::Error> {
        UserRepo::admin_exists(&self.pool).await
    }
}

#[async_trait]
impl BookStore for PgStore {
    async fn create(&self, draft: &BookDraft) -> Result<Book, sqlx::Error> {
        BookRepo::create(&self.pool, draft).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        BookRepo::find_by_id(&self.pool, id).await
    }

    async fn update(&self, id: DbId, draft: &BookDraft) -> Result<bool, sqlx::Error> {
        BookRepo::update(&self.pool, id, draft).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        BookRepo::delete(&self.pool, id).await
    }

    async fn search(&self, criteria: &FilterCriteria<BookStatus>) -> Result<Vec<Book>, sqlx::Error> {
        BookRepo::search(&self.pool, criteria).await
    }
}

#[async_trait]
impl ActivitySink for PgStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), sqlx::Error> {
        ActivityRepo::insert(&self.pool, entry).await.map(|_| ())
    }

    async fn recent_for_actor(
        &self,
        actor_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        ActivityRepo::list_for_actor(&self.pool, actor_id, limit).await
    }
}
