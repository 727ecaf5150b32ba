//! Repository for the append-only `activity_logs` table.

use ink_core::activity::ActivityEntry;
use ink_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::ActivityLog;

const COLUMNS: &str = "id, actor_id, actor_name, action, details, ip_address, \
                       user_agent, occurred_at, created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry, returning the new row id.
    pub async fn insert(pool: &PgPool, entry: &ActivityEntry) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO activity_logs
                (actor_id, actor_name, action, details, ip_address, user_agent, occurred_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(entry.actor_id)
        .bind(&entry.actor_name)
        .bind(&entry.action)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.occurred_at)
        .fetch_one(pool)
        .await
    }

    /// Most recent entries for one actor.
    pub async fn list_for_actor(
        pool: &PgPool,
        actor_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE actor_id = $1
             ORDER BY occurred_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(actor_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
