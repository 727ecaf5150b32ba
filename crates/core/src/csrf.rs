//! Random token generation and constant-time comparison.
//!
//! Used for CSRF tokens and for opaque session identifiers.

use subtle::ConstantTimeEq;

/// Bytes of entropy in every generated token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a random token: [`TOKEN_BYTES`] bytes, lowercase hex encoded.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Whether `value` has the shape of a token produced by [`generate_token`].
pub fn is_well_formed(value: &str) -> bool {
    value.len() == TOKEN_BYTES * 2 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Compare two tokens in constant time (for equal-length inputs).
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
