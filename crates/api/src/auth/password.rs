//! Argon2id password hashing and verification.
//!
//! Hashes use the PHC string format, so algorithm parameters and salt travel
//! with the hash itself.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash checked when a login names an unknown account.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| match hash_password("ink-dummy-password") {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build dummy password hash; unknown-account logins will return faster");
            None
        }
    });

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Spend the same effort as a real verification, for logins whose account
/// does not exist. The outcome is discarded.
pub fn verify_against_dummy(password: &str) {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, dummy);
    }
}
