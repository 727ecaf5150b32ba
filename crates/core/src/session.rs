//! Per-client session state and its transitions.
//!
//! A [`Session`] is the request-scoped view of one client's stored
//! [`SessionData`]. It records how the request changed the data
//! ([`Lifecycle`]) so the layer that owns the store knows whether to write
//! it back, move it to a fresh identifier, or drop it.
//!
//! The authenticated identity is a single `Option<Identity>`: a session is
//! either fully authenticated or anonymous, never partially populated.

use serde::{Deserialize, Serialize};

use crate::csrf::{self, generate_token};
use crate::error::CoreError;
use crate::flash::Flash;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// The authenticated user bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Time of login, refreshed on every successful guarded access.
    pub login_at: Timestamp,
}

/// The user fields copied into a session on login.
#[derive(Debug, Clone)]
pub struct SessionUser<'a> {
    pub user_id: DbId,
    pub name: &'a str,
    pub email: &'a str,
    pub role: Role,
}

/// Everything persisted for one session identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub identity: Option<Identity>,
    pub csrf_token: Option<String>,
    pub flash: Option<Flash>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.csrf_token.is_none() && self.flash.is_none()
    }
}

/// What the current request did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Nothing changed.
    Unchanged,
    /// Data changed; keep the same identifier.
    Modified,
    /// A login happened; the old identifier must be replaced.
    Renewed,
    /// The session was destroyed; the old identifier must be dropped.
    Destroyed,
}

impl Lifecycle {
    /// Whether the identifier presented by the client must stop working.
    pub fn rotates_identifier(&self) -> bool {
        matches!(self, Self::Renewed | Self::Destroyed)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    data: SessionData,
    lifecycle: Lifecycle,
}

impl Session {
    /// A fresh anonymous session with no stored data.
    pub fn new() -> Self {
        Self::from_data(SessionData::default())
    }

    /// Wrap data loaded from the session store.
    pub fn from_data(data: SessionData) -> Self {
        Self {
            data,
            lifecycle: Lifecycle::Unchanged,
        }
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn into_parts(self) -> (SessionData, Lifecycle) {
        (self.data, self.lifecycle)
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Authenticate this session as `user`.
    ///
    /// Replaces any previous identity, stamps `login_at = now`, issues a fresh
    /// CSRF token, and marks the identifier for rotation.
    pub fn create(&mut self, user: SessionUser<'_>, now: Timestamp) -> &Identity {
        self.data.csrf_token = Some(generate_token());
        self.lifecycle = Lifecycle::Renewed;
        self.data.identity.insert(Identity {
            user_id: user.user_id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role,
            login_at: now,
        })
    }

    /// The authenticated identity, if any. Never extends the timeout.
    pub fn identity(&self) -> Option<&Identity> {
        self.data.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.identity.is_some()
    }

    /// Clear every field and invalidate the identifier. Idempotent.
    pub fn destroy(&mut self) {
        self.data = SessionData::default();
        self.lifecycle = Lifecycle::Destroyed;
    }

    /// Sliding expiration: move `login_at` forward to `now`.
    ///
    /// Only the access guard calls this, after the timeout check passed.
    pub(crate) fn renew(&mut self, now: Timestamp) {
        if let Some(identity) = self.data.identity.as_mut() {
            identity.login_at = now;
            self.mark_modified();
        }
    }

    // -----------------------------------------------------------------------
    // CSRF
    // -----------------------------------------------------------------------

    /// Return the live CSRF token, creating one on first access.
    pub fn issue_csrf_token(&mut self) -> String {
        if let Some(token) = &self.data.csrf_token {
            return token.clone();
        }
        self.regenerate_csrf_token()
    }

    /// Replace the CSRF token with a new value.
    pub fn regenerate_csrf_token(&mut self) -> String {
        let token = generate_token();
        self.data.csrf_token = Some(token.clone());
        self.mark_modified();
        token
    }

    /// Check a presented CSRF token against the live one.
    ///
    /// Fails when either side is missing or the values differ.
    pub fn verify_csrf_token(&self, presented: Option<&str>) -> Result<(), CoreError> {
        match (self.data.csrf_token.as_deref(), presented) {
            (Some(expected), Some(presented))
                if !presented.is_empty() && csrf::tokens_match(expected, presented) =>
            {
                Ok(())
            }
            _ => Err(CoreError::CsrfMismatch),
        }
    }

    // -----------------------------------------------------------------------
    // Flash
    // -----------------------------------------------------------------------

    /// Store a message for the next response, replacing any pending one.
    pub fn set_flash(&mut self, flash: Flash) {
        self.data.flash = Some(flash);
        self.mark_modified();
    }

    /// Remove and return the pending message.
    pub fn take_flash(&mut self) -> Option<Flash> {
        let flash = self.data.flash.take();
        if flash.is_some() {
            self.mark_modified();
        }
        flash
    }

    fn mark_modified(&mut self) {
        if self.lifecycle == Lifecycle::Unchanged {
            self.lifecycle = Lifecycle::Modified;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
