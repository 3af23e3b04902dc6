//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, segments, query, headers, body?)
//!     → target.rs (base + joined segments + raw query)
//!     → security::headers (drop host, content-length)
//!     → client.rs (single outbound call under a deadline)
//!     → body.rs (JSON re-encode or raw passthrough)
//!     → RelayedResponse (status, headers, body)
//! ```

pub mod body;
pub mod client;
pub mod error;
pub mod forwarder;
pub mod target;

pub use body::ResponseBody;
pub use client::UpstreamClient;
pub use error::ForwardError;
pub use forwarder::{carries_body, Forwarder, InboundRequest, RelayedResponse};
pub use target::{split_segments, UpstreamBase};
