//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and HTTP layer produce:
//!     → logging.rs (structured tracing events, request id attached)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
