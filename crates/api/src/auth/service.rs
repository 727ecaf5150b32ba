//! Authentication flows over a [`CredentialStore`] and a [`Session`].
//!
//! These functions hold the ordering rules; handlers only add CSRF checks,
//! activity records and redirects around them.

use chrono::Utc;
use ink_core::error::CoreError;
use ink_core::flash::messages;
use ink_core::roles::Role;
use ink_core::session::{Identity, Session, SessionUser};
use ink_core::validation::{
    is_valid_email, normalize_email, validate_new_password, validate_registration,
    RegistrationIssue,
};
use ink_db::models::user::{CreateUser, User};

use super::password::{hash_password, verify_against_dummy, verify_password};
use crate::config::AdminBootstrap;
use crate::error::{is_unique_violation, AppError, AppResult, UQ_USERS_EMAIL};
use crate::store::CredentialStore;

/// Authenticate `email` / `password` and bind the user to `session`.
///
/// Unknown email and wrong password fail identically. The active flag is
/// checked only after the password matched.
pub async fn login(
    users: &dyn CredentialStore,
    session: &mut Session,
    email: &str,
    password: &str,
) -> AppResult<Identity> {
    let email = normalize_email(email);
    if !is_valid_email(&email) || password.is_empty() {
        return Err(CoreError::Validation(messages::LOGIN_FIELDS_REQUIRED.into()).into());
    }

    let Some(user) = users.find_by_email(&email).await? else {
        verify_against_dummy(password);
        tracing::info!("Login failed: unknown account");
        return Err(CoreError::InvalidCredentials.into());
    };

    let matches = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    if !user.is_active {
        tracing::info!(user_id = user.id, "Login refused: account disabled");
        return Err(CoreError::AccountDisabled.into());
    }

    users.record_login(user.id).await?;
    let identity = session
        .create(
            SessionUser {
                user_id: user.id,
                name: &user.name,
                email: &user.email,
                role: user.role,
            },
            Utc::now(),
        )
        .clone();

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(identity)
}

/// Register a new staff account.
///
/// Every problem with the form is reported together, including an email
/// that is already taken.
pub async fn register(
    users: &dyn CredentialStore,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<User> {
    let checked = validate_registration(name, email, password, confirm_password);

    let normalized = normalize_email(email);
    let taken = is_valid_email(&normalized) && users.email_exists(&normalized).await?;

    let registration = match checked {
        Ok(_) if taken => return Err(AppError::Registration(vec![RegistrationIssue::EmailTaken])),
        Ok(registration) => registration,
        Err(mut issues) => {
            if taken {
                issues.push(RegistrationIssue::EmailTaken);
            }
            return Err(AppError::Registration(issues));
        }
    };

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        name: registration.name,
        email: registration.email,
        password_hash,
        role: Role::Staff,
    };

    match users.create(&input).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User registered");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e, UQ_USERS_EMAIL) => {
            Err(AppError::Registration(vec![RegistrationIssue::EmailTaken]))
        }
        Err(e) => Err(e.into()),
    }
}

/// End the session. Always succeeds.
pub fn logout(session: &mut Session) -> Option<Identity> {
    let previous = session.identity().cloned();
    session.destroy();
    previous
}

/// Replace the current user's password after checking the old one.
///
/// The CSRF token is regenerated afterwards.
pub async fn change_password(
    users: &dyn CredentialStore,
    session: &mut Session,
    identity: &Identity,
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> AppResult<()> {
    let user = users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: identity.user_id,
        })?;

    let matches = verify_password(current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(CoreError::Validation(messages::CURRENT_PASSWORD_INCORRECT.into()).into());
    }

    validate_new_password(new_password, confirm_password)
        .map_err(|issue| CoreError::Validation(issue.to_string()))?;

    let password_hash = hash_password(new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !users.update_password(user.id, &password_hash).await? {
        return Err(CoreError::NotFound {
            entity: "user",
            id: user.id,
        }
        .into());
    }

    session.regenerate_csrf_token();
    tracing::info!(user_id = user.id, "Password changed");
    Ok(())
}

/// Create the configured admin account unless an admin already exists.
///
/// Returns the created user, or `None` when bootstrap was not needed.
pub async fn bootstrap_admin(
    users: &dyn CredentialStore,
    admin: &AdminBootstrap,
) -> AppResult<Option<User>> {
    if users.admin_exists().await? {
        tracing::debug!("Admin account already exists, skipping bootstrap");
        return Ok(None);
    }

    let registration =
        validate_registration(&admin.name, &admin.email, &admin.password, &admin.password)
            .map_err(AppError::Registration)?;

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = users
        .create(&CreateUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin account created");
    Ok(Some(user))
}
