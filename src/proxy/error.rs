//! Forwarding failures and how they surface to the inbound caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

/// Why a single forward failed. Nothing is retried; every variant becomes a
/// failed response for the caller.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream target '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("failed to read inbound body: {0}")]
    InboundBody(#[source] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    UpstreamBody(#[source] axum::Error),

    #[error("upstream declared JSON but sent an invalid body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Status returned to the inbound caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InvalidTarget { .. } | ForwardError::InboundBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ForwardError::Upstream(_)
            | ForwardError::UpstreamBody(_)
            | ForwardError::InvalidJson(_) => StatusCode::BAD_GATEWAY,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::InvalidTarget { .. } => "invalid_target",
            ForwardError::InboundBody(_) => "inbound_body",
            ForwardError::Upstream(_) => "upstream",
            ForwardError::UpstreamBody(_) => "upstream_body",
            ForwardError::InvalidJson(_) => "invalid_json",
            ForwardError::Timeout(_) => "timeout",
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ForwardError::InvalidTarget { .. } => "Invalid forward target",
            ForwardError::InboundBody(_) => "Failed to read request body",
            ForwardError::Upstream(_) => "Upstream request failed",
            ForwardError::UpstreamBody(_) => "Failed to read upstream response",
            ForwardError::InvalidJson(_) => "Upstream returned invalid JSON",
            ForwardError::Timeout(_) => "Upstream timed out",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
