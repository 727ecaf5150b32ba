//! INK inventory web server library.
//!
//! Exposes the building blocks (config, state, sessions, error handling,
//! routes) so integration tests and the binary entrypoint share them.

pub mod activity;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
