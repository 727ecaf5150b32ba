//! Session cookie parsing and `Set-Cookie` values.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use crate::config::SessionConfig;

/// Find the value of cookie `name` across all `Cookie` headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value binding the client to session `id`.
pub fn issue(config: &SessionConfig, id: &str) -> String {
    let mut cookie = format!(
        "{}={id}; Path=/; HttpOnly; SameSite=Lax",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value telling the client to drop the session cookie.
pub fn expire(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
