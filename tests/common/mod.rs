//! Shared utilities for integration testing.

#![allow(dead_code)]

use api_forwarder::config::ProxyConfig;
use api_forwarder::http::HttpServer;
use api_forwarder::lifecycle::Shutdown;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// What the mock upstream saw.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    /// Origin-form target, e.g. "/a/b?q=1".
    pub target: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static [u8],
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: vec![("content-type", content_type)],
            body: body.as_bytes(),
            delay: None,
        }
    }

    pub fn json(body: &'static str) -> Self {
        Self::new(200, "application/json", body)
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Replace the body with bytes that need not be UTF-8.
    pub fn with_body(mut self, body: &'static [u8]) -> Self {
        self.body = body;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    captured: Arc<Mutex<Vec<Captured>>>,
}

/// A mock upstream recording every request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("upstream received no request")
    }
}

async fn capture(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.captured.lock().unwrap().push(Captured {
        method: parts.method,
        target: parts.uri.to_string(),
        headers: parts.headers,
        body,
    });

    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::new(Body::from(state.reply.body));
    *response.status_mut() = state.reply.status;
    for (name, value) in &state.reply.headers {
        response
            .headers_mut()
            .append(*name, HeaderValue::from_static(*value));
    }
    response
}

/// Start a mock upstream on an ephemeral port answering every request with
/// `reply`.
pub async fn start_mock_upstream(reply: Reply) -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        captured: captured.clone(),
    };
    let app = Router::new().fallback(capture).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

/// Start an upstream that accepts, reads the request, then hangs up without
/// answering. Returns its address and an accept counter.
pub async fn start_hangup_upstream() -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicU32::new(0));
    let counter = accepts.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                drop(socket);
            });
        }
    });

    (addr, accepts)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Default config pointing at `upstream`.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = format!("http://{}/", upstream);
    config
}

/// A running forwarder. Shuts down when dropped.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the forwarder on an ephemeral port.
pub async fn start_proxy(mut config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    RunningProxy { addr, shutdown }
}

/// Inbound caller: no system proxy, no connection reuse between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Headers a test never sets itself but the transports add.
pub fn is_transport_header(name: &header::HeaderName) -> bool {
    *name == header::HOST || *name == header::CONTENT_LENGTH || *name == header::ACCEPT
}
