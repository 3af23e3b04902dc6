//! The request forwarder.
//!
//! One inbound request in, exactly one outbound request out, one relayed
//! response back. Stateless across calls; the only shared piece is the
//! pooled client.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::config::ProxyConfig;
use crate::proxy::body::ResponseBody;
use crate::proxy::client::UpstreamClient;
use crate::proxy::error::ForwardError;
use crate::proxy::target::UpstreamBase;
use crate::security::{inject_bearer_token, sanitize_request_headers, sanitize_response_headers};

/// An inbound request, already split into the pieces the forwarder needs.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Path components after the mount prefix. May be empty.
    pub segments: Vec<String>,
    /// Raw query without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Only present for methods other than GET and HEAD.
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn new(method: Method, segments: Vec<String>, query: Option<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            segments,
            query,
            headers,
            body: None,
        }
    }

    /// Attach a body. Ignored for GET and HEAD.
    pub fn with_body(mut self, body: Bytes) -> Self {
        if carries_body(&self.method) {
            self.body = Some(body);
        }
        self
    }
}

/// Whether the body of a request with this method is read and forwarded.
pub fn carries_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}

/// The upstream answer, ready to hand back to the inbound caller.
#[derive(Debug)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl RelayedResponse {
    /// Encode the body and build the outgoing response. A re-encoded body is
    /// framed again by the serving transport.
    pub fn into_http(self) -> Result<Response, ForwardError> {
        let reencoded = self.body.is_reencoded();
        let bytes = self.body.into_bytes()?;
        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        sanitize_response_headers(response.headers_mut(), reencoded);
        Ok(response)
    }
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        match self.into_http() {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}

/// Replays requests against the configured upstream.
#[derive(Clone)]
pub struct Forwarder {
    base: UpstreamBase,
    client: UpstreamClient,
    token_cookie: Option<String>,
}

impl Forwarder {
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            base: UpstreamBase::new(&config.upstream.base_url),
            client: UpstreamClient::new(&config.timeouts),
            token_cookie: config.auth.token_cookie.clone(),
        }
    }

    /// Target URI for a request, without sending anything.
    pub fn target(&self, request: &InboundRequest) -> Result<Uri, ForwardError> {
        self.base.target(&request.segments, request.query.as_deref())
    }

    /// Forward one request and relay the answer.
    pub async fn forward(&self, request: InboundRequest) -> Result<RelayedResponse, ForwardError> {
        let uri = self.target(&request)?;
        let InboundRequest {
            method,
            mut headers,
            body,
            ..
        } = request;

        sanitize_request_headers(&mut headers);
        if let Some(cookie) = &self.token_cookie {
            if inject_bearer_token(&mut headers, cookie) {
                tracing::trace!(cookie = %cookie, "Injected bearer token from cookie");
            }
        }

        let body = match body {
            Some(bytes) if carries_body(&method) => Body::from(bytes),
            _ => Body::empty(),
        };

        let mut outbound = Request::new(body);
        *outbound.method_mut() = method.clone();
        *outbound.uri_mut() = uri;
        *outbound.headers_mut() = headers;

        tracing::debug!(method = %method, target = %outbound.uri(), "Forwarding upstream");

        let (parts, bytes) = self.client.send(outbound).await?;
        let body = ResponseBody::from_upstream(&method, parts.status, &parts.headers, bytes)?;

        Ok(RelayedResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
