//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: forwarder under the configured prefix, liveness
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Serve on a listener until the shutdown broadcast fires
//!
//! Only GET (and with it HEAD), POST, PUT, DELETE and PATCH are routed; other
//! methods get Axum's default 405.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::http::request::{extract_inbound, request_id, RequestId, RequestIdExt};
use crate::http::response::{health_check, respond};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::Forwarder;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub prefix: Arc<str>,
    pub body_limit: usize,
}

/// HTTP server exposing the forwarder.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server. The configuration is validated first.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let state = AppState {
            forwarder: Arc::new(Forwarder::new(&config)),
            prefix: Arc::from(config.routes.prefix.as_str()),
            body_limit: config.limits.max_body_bytes.unwrap_or(usize::MAX),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = config.routes.prefix.as_str();
        let forward: MethodRouter<AppState> = get(forward_handler)
            .post(forward_handler)
            .put(forward_handler)
            .delete(forward_handler)
            .patch(forward_handler);

        Router::new()
            .route("/healthz", get(health_check))
            .route(prefix, forward.clone())
            .route(&format!("{}/", prefix), forward.clone())
            .route(&format!("{}/{{*path}}", prefix), forward)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            prefix = %self.config.routes.prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Forwarder handler. Dropping this future (client went away, request
/// timeout) drops the outbound call with it.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .request_id()
        .cloned()
        .unwrap_or_else(RequestId::generate);
    let method = request.method().clone();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        "Proxying request"
    );

    let result = match extract_inbound(request, &state.prefix, state.body_limit).await {
        Ok(inbound) => state.forwarder.forward(inbound).await,
        Err(e) => Err(e),
    };

    let (response, outcome) = respond(&request_id, result);

    tracing::debug!(
        request_id = %request_id,
        status = %response.status(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Request complete"
    );
    metrics::record_request(method.as_str(), response.status().as_u16(), outcome, start_time);

    response
}
