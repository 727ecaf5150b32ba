//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ink_core::flow::Flow;
use ink_core::guard;
use ink_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role.
///
/// Other roles are redirected home with a permission notice; their session
/// stays intact.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { identity, session } = AuthUser::from_request_parts(parts, state).await?;
        match guard::require_role(identity, Role::Admin) {
            Flow::Continue(identity) => Ok(RequireAdmin(AuthUser { identity, session })),
            Flow::Redirect(redirect) => {
                tracing::warn!("Non-admin user denied access to admin page");
                Err(AppError::Redirect(redirect))
            }
        }
    }
}
