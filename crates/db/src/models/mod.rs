//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the table row and the
//! DTOs used for inserts.

pub mod activity;
pub mod book;
pub mod user;
