//! Registration and password-change input rules.
//!
//! Registration collects every problem instead of stopping at the first one,
//! so the form can show all of them together.

use validator::ValidateEmail;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trim and lowercase an email address before lookup or storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}

/// One reason a registration form was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationIssue {
    #[error("Name must be at least 2 characters long.")]
    NameTooShort,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("This email is already registered.")]
    EmailTaken,
}

/// A registration form that passed every local check.
///
/// Email uniqueness is checked against the store separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validate a registration form, returning every issue found.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Registration, Vec<RegistrationIssue>> {
    let name = name.trim();
    let email = normalize_email(email);
    let mut issues = Vec::new();

    if name.chars().count() < MIN_NAME_LENGTH {
        issues.push(RegistrationIssue::NameTooShort);
    }
    if !is_valid_email(&email) {
        issues.push(RegistrationIssue::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        issues.push(RegistrationIssue::PasswordTooShort);
    }
    if password != confirm_password {
        issues.push(RegistrationIssue::PasswordMismatch);
    }

    if issues.is_empty() {
        Ok(Registration {
            name: name.to_string(),
            email,
            password: password.to_string(),
        })
    } else {
        Err(issues)
    }
}

/// Check a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<(), RegistrationIssue> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationIssue::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(RegistrationIssue::PasswordMismatch);
    }
    Ok(())
}
