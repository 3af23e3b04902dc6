//! Request handling.
//!
//! # Responsibilities
//! - Attach a request ID (reuse `x-request-id` or generate a UUID v4)
//! - Split an inbound HTTP request into an `InboundRequest`
//!
//! # Design Decisions
//! - The request ID lives in request extensions only; it is never added to
//!   the headers forwarded upstream
//! - The path suffix is taken from the raw, still-encoded request path

use axum::{
    body::Body,
    extract::Request,
    http::{self, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::fmt;

use crate::proxy::{carries_body, split_segments, ForwardError, InboundRequest};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    fn from_header(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access the request ID attached by [`request_id`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for http::Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware attaching a [`RequestId`] extension.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(RequestId::from_header)
        .unwrap_or_else(RequestId::generate);
    request.extensions_mut().insert(id);
    next.run(request).await
}

/// Raw path suffix after `prefix`, without its leading `/`.
pub fn path_suffix<'a>(path: &'a str, prefix: &str) -> &'a str {
    let rest = path.strip_prefix(prefix).unwrap_or(path);
    rest.strip_prefix('/').unwrap_or(rest)
}

/// Split an inbound request mounted at `prefix` into an [`InboundRequest`].
///
/// The body is read only for methods other than GET and HEAD, up to `limit`
/// bytes.
pub async fn extract_inbound(
    request: http::Request<Body>,
    prefix: &str,
    limit: usize,
) -> Result<InboundRequest, ForwardError> {
    let (parts, body) = request.into_parts();

    let segments = split_segments(path_suffix(parts.uri.path(), prefix));
    let query = parts.uri.query().map(str::to_string);
    let inbound = InboundRequest::new(parts.method, segments, query, parts.headers);

    if !carries_body(&inbound.method) {
        return Ok(inbound);
    }

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(ForwardError::InboundBody)?;
    Ok(inbound.with_body(bytes))
}
