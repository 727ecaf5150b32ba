use std::collections::HashMap;

use chrono::{Duration, Utc};
use ink_core::csrf::generate_token;
use ink_core::session::SessionData;
use ink_core::types::Timestamp;
use tokio::sync::RwLock;

struct StoredSession {
    data: SessionData,
    last_seen: Timestamp,
}

/// Extra retention past the session timeout. Matches the purge interval.
pub const RETENTION_GRACE_SECS: i64 = 300;

/// In-process session records.
///
/// A record untouched for longer than the retention window is treated as
/// absent and dropped, either lazily on [`load`](Self::load) or by
/// [`purge_idle`](Self::purge_idle). The window must outlast the session
/// timeout: expiry is decided by the access guard, which needs the record
/// to still be there.
pub struct SessionStore {
    records: RwLock<HashMap<String, StoredSession>>,
    retention: Duration,
}

impl SessionStore {
    pub fn new(retention_secs: i64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            retention: Duration::seconds(retention_secs),
        }
    }

    /// Store for sessions that expire after `timeout_secs` of inactivity.
    pub fn for_timeout(timeout_secs: i64) -> Self {
        Self::new(timeout_secs.saturating_add(RETENTION_GRACE_SECS))
    }

    /// Fetch the data stored under `id`, refreshing its idle clock.
    pub async fn load(&self, id: &str) -> Option<SessionData> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        match records.get_mut(id) {
            Some(record) if now - record.last_seen <= self.retention => {
                record.last_seen = now;
                Some(record.data.clone())
            }
            Some(_) => {
                records.remove(id);
                None
            }
            None => None,
        }
    }

    /// Store `data` under a fresh identifier and return it.
    pub async fn insert(&self, data: SessionData) -> String {
        let mut records = self.records.write().await;
        let id = loop {
            let candidate = generate_token();
            if !records.contains_key(&candidate) {
                break candidate;
            }
        };
        records.insert(
            id.clone(),
            StoredSession {
                data,
                last_seen: Utc::now(),
            },
        );
        id
    }

    /// Overwrite the data under an existing identifier. Last write wins.
    pub async fn save(&self, id: &str, data: SessionData) {
        self.records.write().await.insert(
            id.to_string(),
            StoredSession {
                data,
                last_seen: Utc::now(),
            },
        );
    }

    pub async fn remove(&self, id: &str) {
        self.records.write().await.remove(id);
    }

    /// Drop every record idle at `now`. Returns how many were removed.
    pub async fn purge_idle(&self, now: Timestamp) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now - record.last_seen <= self.retention);
        before - records.len()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
