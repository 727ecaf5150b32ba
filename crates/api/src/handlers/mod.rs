//! Request handlers, one module per resource.
//!
//! Page handlers return a [`DataResponse`](crate::response::DataResponse)
//! page model. Form handlers verify the CSRF token before touching any
//! store and answer with a [`SeeOther`](crate::response::SeeOther).

pub mod account;
pub mod admin;
pub mod auth;
pub mod books;

use ink_core::flash::messages;
use ink_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const REGISTER_PATH: &str = "/register";
pub const ACCOUNT_PATH: &str = "/account";
pub const ADMIN_USERS_PATH: &str = "/admin/users";

/// Body of forms that carry nothing but the CSRF token.
#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    pub csrf_token: Option<String>,
}

/// Parse a record id from a path or form value. Only positive integers are ids.
pub(crate) fn parse_id(raw: &str) -> AppResult<DbId> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(messages::INVALID_ID.into())),
    }
}

/// Parse an optional boolean filter: `1`/`true` or `0`/`false`.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id(" 12 ").ok(), Some(12));
        assert_matches!(parse_id("0"), Err(AppError::BadRequest(_)));
        assert_matches!(parse_id("-3"), Err(AppError::BadRequest(_)));
        assert_matches!(parse_id("abc"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), None);
        assert_eq!(parse_flag("yes"), None);
    }
}
