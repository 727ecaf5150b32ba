//! Explicit control-flow results for request gates.
//!
//! A gate either lets the request continue with a value or ends it with a
//! redirect. The HTTP layer decides how to turn a [`Redirect`] into a
//! response.

use crate::flash::Flash;

/// Where to send the client, and what to tell them when they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub flash: Option<Flash>,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            flash: None,
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    Continue(T),
    Redirect(Redirect),
}

impl<T> Flow<T> {
    /// Convert into a `Result`, mapping the redirect branch to the error side.
    pub fn into_result(self) -> Result<T, Redirect> {
        match self {
            Self::Continue(value) => Ok(value),
            Self::Redirect(redirect) => Err(redirect),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}
