//! User roles.
//!
//! Exactly two roles exist. These names must match the `chk_users_role`
//! constraint in the `users` migration.

use serde::{Deserialize, Serialize};

use crate::filter::EnumFilter;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    /// Return the role name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Staff => ROLE_STAFF,
        }
    }

    /// Parse a role name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_STAFF => Some(Self::Staff),
            _ => None,
        }
    }

    /// Parse a role name, downgrading anything unknown to [`Role::Staff`].
    pub fn from_str_or_staff(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::Staff)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// All valid role names.
    pub const ALL: &'static [&'static str] = &[ROLE_ADMIN, ROLE_STAFF];
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from_str_or_staff(&value)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EnumFilter for Role {
    fn parse_filter(raw: &str) -> Option<Self> {
        Self::from_str(raw)
    }

    fn filter_value(&self) -> &'static str {
        self.as_str()
    }
}
