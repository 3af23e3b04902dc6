//! Same-origin API forwarder.
//!
//! Exposes a wildcard route (default `/api/proxy/*`) that replays every
//! request against a single configured upstream and relays the answer.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{Forwarder, InboundRequest, RelayedResponse};
