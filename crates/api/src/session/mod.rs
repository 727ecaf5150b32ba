//! Cookie-bound server-side sessions.
//!
//! - [`store::SessionStore`] -- in-process records keyed by opaque identifier.
//! - [`middleware::session_layer`] -- loads the record for each request and
//!   persists it afterwards according to its lifecycle.

pub mod cookie;
pub mod middleware;
pub mod store;

pub use middleware::{session_layer, SessionHandle};
pub use store::SessionStore;
