//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing under the prefix)
//!     → request.rs (request ID, split into InboundRequest)
//!     → proxy::Forwarder (one outbound call)
//!     → response.rs (relay or map the failure)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
