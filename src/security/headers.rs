//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Drop `host` and `content-length` from inbound headers before replaying
//!   them upstream; the outbound transport recomputes both
//! - Drop `transfer-encoding` from relayed responses, and `content-length`
//!   when the relayed body was re-encoded; the serving transport frames it
//!   again. An untouched body keeps the upstream length, which for HEAD and
//!   304 describes the resource rather than the (empty) payload
//!
//! Everything else passes through untouched, duplicates included.

use axum::http::{header, HeaderMap, HeaderName};

/// Inbound headers never forwarded upstream.
pub const STRIPPED_REQUEST_HEADERS: [HeaderName; 2] = [header::HOST, header::CONTENT_LENGTH];

/// Upstream response headers never relayed back.
pub const STRIPPED_RESPONSE_HEADERS: [HeaderName; 1] = [header::TRANSFER_ENCODING];

/// Remove `host` and `content-length` from inbound headers.
pub fn sanitize_request_headers(headers: &mut HeaderMap) {
    for name in &STRIPPED_REQUEST_HEADERS {
        headers.remove(name);
    }
}

/// Remove framing headers from an upstream response. `content-length` goes
/// too when `reencoded`, since it no longer matches the body.
pub fn sanitize_response_headers(headers: &mut HeaderMap, reencoded: bool) {
    for name in &STRIPPED_RESPONSE_HEADERS {
        headers.remove(name);
    }
    if reencoded {
        headers.remove(header::CONTENT_LENGTH);
    }
}
