//! Domain layer for the INK inventory service.
//!
//! Everything in this crate is pure: no database access, no HTTP. The `db`
//! and `api` crates build on these types so the session, guard, and filter
//! rules can be tested without any I/O.

pub mod activity;
pub mod book;
pub mod csrf;
pub mod error;
pub mod filter;
pub mod flash;
pub mod flow;
pub mod guard;
pub mod roles;
pub mod session;
pub mod types;
pub mod validation;
