use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ink_core::error::CoreError;
use ink_core::flash::{messages, Flash};
use ink_core::flow::Redirect;
use ink_core::validation::RegistrationIssue;
use serde_json::json;

use crate::response::SeeOther;

/// Unique constraint on `users.email`.
pub const UQ_USERS_EMAIL: &str = "uq_users_email";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Form handlers turn errors into a redirect with a flash message through
/// [`RedirectOnError::or_redirect`]; anything else falls back to a JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ink_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Every problem found in a registration form.
    #[error("Registration rejected: {0:?}")]
    Registration(Vec<RegistrationIssue>),

    /// End the request with a redirect. Produced by the access guard and by
    /// [`RedirectOnError::or_redirect`].
    #[error("Redirect to {}", .0.to)]
    Redirect(Redirect),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The flash message a user sees for this error.
    ///
    /// Store and internal failures are logged here and reduced to a generic
    /// message.
    pub fn flash(&self) -> Flash {
        match self {
            AppError::Core(core) => match core {
                CoreError::InvalidCredentials => Flash::danger(messages::INVALID_CREDENTIALS),
                CoreError::AccountDisabled => Flash::warning(messages::ACCOUNT_DISABLED),
                CoreError::CsrfMismatch => {
                    tracing::warn!("CSRF token mismatch");
                    Flash::danger(messages::CSRF_MISMATCH)
                }
                CoreError::NotFound { entity: "book", .. } => {
                    Flash::warning(messages::BOOK_NOT_FOUND)
                }
                CoreError::NotFound { entity: "user", .. } => {
                    Flash::warning(messages::USER_NOT_FOUND)
                }
                CoreError::NotFound { entity, id } => {
                    Flash::warning(format!("{entity} with id {id} not found"))
                }
                CoreError::Validation(msg) | CoreError::Conflict(msg) => Flash::danger(msg.clone()),
                CoreError::Unauthorized(msg) | CoreError::Forbidden(msg) => {
                    Flash::danger(msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    Flash::danger(messages::GENERIC_FAILURE)
                }
            },
            AppError::Database(err) if is_unique_violation(err, UQ_USERS_EMAIL) => {
                Flash::danger(RegistrationIssue::EmailTaken.to_string())
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                Flash::danger(messages::GENERIC_FAILURE)
            }
            AppError::Registration(issues) => Flash::danger(
                issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            AppError::Redirect(redirect) => redirect
                .flash
                .clone()
                .unwrap_or_else(|| Flash::info(String::new())),
            AppError::BadRequest(msg) => Flash::warning(msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Flash::danger(messages::GENERIC_FAILURE)
            }
        }
    }

    /// Convert into a redirect to `path` carrying this error's flash.
    /// An existing redirect is kept as is.
    pub fn redirect_to(self, path: &str) -> AppError {
        match self {
            AppError::Redirect(_) => self,
            other => AppError::Redirect(Redirect::to(path).with_flash(other.flash())),
        }
    }
}

/// Turn any handler error into a redirect back to a page.
pub trait RedirectOnError<T> {
    fn or_redirect(self, path: &str) -> AppResult<T>;
}

impl<T, E: Into<AppError>> RedirectOnError<T> for Result<T, E> {
    fn or_redirect(self, path: &str) -> AppResult<T> {
        self.map_err(|e| e.into().redirect_to(path))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Redirect(redirect) => return SeeOther(redirect.clone()).into_response(),

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    messages::INVALID_CREDENTIALS.to_string(),
                ),
                CoreError::AccountDisabled => (
                    StatusCode::FORBIDDEN,
                    "ACCOUNT_DISABLED",
                    messages::ACCOUNT_DISABLED.to_string(),
                ),
                CoreError::CsrfMismatch => (
                    StatusCode::FORBIDDEN,
                    "CSRF_MISMATCH",
                    messages::CSRF_MISMATCH.to_string(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        messages::GENERIC_FAILURE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Registration(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.flash().message,
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    messages::GENERIC_FAILURE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Whether `err` is a PostgreSQL unique violation (23505) on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Duplicate value".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                messages::GENERIC_FAILURE.to_string(),
            )
        }
    }
}
