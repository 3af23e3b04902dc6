//! Outbound HTTP client.

use axum::body::{Body, Bytes};
use axum::http::{response::Parts, Request};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::proxy::error::ForwardError;
use crate::resilience::with_deadline;

/// Pooled client for the single upstream. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    deadline: Duration,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            deadline: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Send one request and read the whole response, all under the upstream
    /// deadline. Never retried.
    pub async fn send(&self, request: Request<Body>) -> Result<(Parts, Bytes), ForwardError> {
        with_deadline(self.deadline, async {
            let response: hyper::Response<Incoming> = self.client.request(request).await?;
            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(ForwardError::UpstreamBody)?;
            Ok((parts, bytes))
        })
        .await
    }
}
