//! One-shot feedback messages handed to the next response.

use serde::{Deserialize, Serialize};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub level: FlashLevel,
}

impl Flash {
    pub fn new(message: impl Into<String>, level: FlashLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, FlashLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, FlashLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, FlashLevel::Warning)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(message, FlashLevel::Danger)
    }
}

/// User-facing message texts.
pub mod messages {
    pub const LOGIN_REQUIRED: &str = "You need to be logged in to access this page.";
    pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
    pub const PERMISSION_DENIED: &str = "You do not have permission to access this page.";
    pub const LOGGED_OUT: &str = "Logged out successfully!";
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
    pub const LOGIN_FIELDS_REQUIRED: &str = "Please enter a valid email and your password.";
    pub const ACCOUNT_DISABLED: &str = "Your account is inactive. Contact the administrator.";
    pub const CSRF_MISMATCH: &str = "Form validation failed. Please try again.";
    pub const GENERIC_FAILURE: &str = "An internal error occurred. Please try again.";
    pub const ACCOUNT_CREATED: &str = "Account created successfully! You can now log in.";
    pub const PASSWORD_CHANGED: &str = "Password changed successfully!";
    pub const CURRENT_PASSWORD_INCORRECT: &str = "Current password is incorrect.";
    pub const BOOK_CREATED: &str = "Book added successfully!";
    pub const BOOK_UPDATED: &str = "Book updated successfully!";
    pub const BOOK_DELETED: &str = "Book deleted successfully!";
    pub const BOOK_NOT_FOUND: &str = "Book not found.";
    pub const INVALID_ID: &str = "Invalid id.";
    pub const USER_NOT_FOUND: &str = "User not found.";
    pub const USER_UPDATED: &str = "User updated successfully!";
    pub const USER_DELETED: &str = "User deleted successfully!";
    pub const CANNOT_MODIFY_SELF: &str = "You cannot change or delete your own account here.";
}
