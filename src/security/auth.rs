//! Bearer-token injection from a cookie.
//!
//! Browsers hold the session token in a cookie; the upstream API expects it
//! as `Authorization: Bearer <token>`. When enabled, the forwarder bridges
//! the two for requests that do not already carry an authorization header.

use axum::http::{header, HeaderMap, HeaderValue};

/// Find the value of cookie `name` across every `cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Set `authorization: Bearer <cookie>` unless one is already present.
///
/// Returns `true` when a header was added.
pub fn inject_bearer_token(headers: &mut HeaderMap, cookie_name: &str) -> bool {
    if headers.contains_key(header::AUTHORIZATION) {
        return false;
    }

    let value = match cookie_value(headers, cookie_name) {
        Some(token) if !token.is_empty() => HeaderValue::from_str(&format!("Bearer {}", token)),
        _ => return false,
    };

    match value {
        Ok(value) => {
            headers.insert(header::AUTHORIZATION, value);
            true
        }
        Err(_) => {
            tracing::debug!(cookie = %cookie_name, "Token cookie is not a valid header value");
            false
        }
    }
}
