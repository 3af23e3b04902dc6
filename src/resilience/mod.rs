//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → connector connect timeout (client.rs)
//!     → timeouts.rs (deadline around send + body read)
//!     → failure surfaces to the caller immediately
//! ```
//!
//! # Design Decisions
//! - Every outbound call has a deadline
//! - One inbound request maps to exactly one outbound attempt: no retries,
//!   no circuit breaking

pub mod timeouts;

pub use timeouts::with_deadline;
