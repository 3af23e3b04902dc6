//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers:
//!     → headers.rs (drop host, content-length)
//!     → auth.rs (optional bearer token from cookie)
//!     → upstream
//!
//! Upstream response headers:
//!     → headers.rs (drop content-length, transfer-encoding)
//!     → inbound caller
//! ```

pub mod auth;
pub mod headers;

pub use auth::inject_bearer_token;
pub use headers::{sanitize_request_headers, sanitize_response_headers};
