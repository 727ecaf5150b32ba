//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`] -- requires a valid, unexpired session.
//! - [`rbac::RequireAdmin`] -- additionally requires the `admin` role.
//! - [`client::ClientInfo`] -- caller IP and user agent for the activity log.

pub mod auth;
pub mod client;
pub mod rbac;
