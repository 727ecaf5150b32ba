//! Authentication primitives and flows.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`service`] -- login, registration, logout, password change, admin bootstrap.

pub mod password;
pub mod service;
