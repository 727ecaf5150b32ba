//! Shared response types for handlers.
//!
//! Page routes answer with a `{ "data": ... }` envelope. Form routes answer
//! with a `303 See Other` redirect, optionally carrying a flash message for
//! the next page.

use axum::response::{IntoResponse, Response};
use ink_core::flash::Flash;
use ink_core::flow::Redirect;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A flash message attached to a response.
///
/// The session layer moves it into the client's session after the handler
/// returns, so code without access to the session can still leave a message.
#[derive(Debug, Clone)]
pub struct PendingFlash(pub Flash);

/// `303 See Other` to `redirect.to`, carrying its flash (if any).
#[derive(Debug)]
pub struct SeeOther(pub Redirect);

impl SeeOther {
    pub fn to(path: impl Into<String>) -> Self {
        Self(Redirect::to(path))
    }

    pub fn with_flash(self, flash: Flash) -> Self {
        Self(self.0.with_flash(flash))
    }
}

impl IntoResponse for SeeOther {
    fn into_response(self) -> Response {
        let Redirect { to, flash } = self.0;
        let mut response = axum::response::Redirect::to(&to).into_response();
        if let Some(flash) = flash {
            response.extensions_mut().insert(PendingFlash(flash));
        }
        response
    }
}
