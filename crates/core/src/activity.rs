//! Activity log entries and their action names.
//!
//! Entries are produced by request handlers and written out-of-band, so
//! building one never fails and never touches I/O.

use chrono::Utc;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Action names
// ---------------------------------------------------------------------------

pub mod actions {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const REGISTER: &str = "register";
    pub const INVENTORY_VIEW: &str = "inventory_view";
    pub const BOOK_CREATE: &str = "book_create";
    pub const BOOK_UPDATE: &str = "book_update";
    pub const BOOK_DELETE: &str = "book_delete";
    pub const PASSWORD_CHANGE: &str = "password_change";
    pub const USER_STATUS_CHANGE: &str = "user_status_change";
    pub const USER_DELETE: &str = "user_delete";
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub action: String,
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: Timestamp,
}

impl ActivityEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            actor_id: None,
            actor_name: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
            ip_address: None,
            user_agent: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId, name: impl Into<String>) -> Self {
        self.actor_id = Some(user_id);
        self.actor_name = Some(name.into());
        self
    }

    /// Attach details. Sensitive keys are redacted on the way in.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = redact_sensitive_fields(&details);
        self
    }

    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

/// Keys whose values never reach the activity log.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "secret", "hash", "cookie"];

/// Replace the value of every key containing a [`SENSITIVE_FIELDS`] entry
/// with `"[REDACTED]"`, recursing into nested objects and arrays.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let val = if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        serde_json::Value::String("[REDACTED]".to_string())
                    } else {
                        redact_sensitive_fields(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
