//! Response handling.
//!
//! # Responsibilities
//! - Turn a forward outcome into the response for the inbound caller
//! - Map forwarding failures to status codes (see `ForwardError::status`)
//! - Liveness endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::http::request::RequestId;
use crate::proxy::{ForwardError, RelayedResponse};

/// Outcome label for a successful relay.
pub const RELAYED: &str = "relayed";

/// Build the caller-facing response. Returns it with its metrics outcome.
pub fn respond(
    request_id: &RequestId,
    result: Result<RelayedResponse, ForwardError>,
) -> (Response, &'static str) {
    match result.and_then(RelayedResponse::into_http) {
        Ok(response) => (response, RELAYED),
        Err(e) => {
            let kind = e.kind();
            tracing::error!(
                request_id = %request_id,
                error = %e,
                kind = kind,
                status = %e.status(),
                "Forward failed"
            );
            (e.into_response(), kind)
        }
    }
}

/// Liveness probe.
pub async fn health_check() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}
