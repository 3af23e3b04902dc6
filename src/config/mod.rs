//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → environment overrides (FORWARDER_*)
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The upstream target is configuration, never a literal in code

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, read_config, resolve_config, ConfigError};
pub use schema::{
    AuthConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RouteConfig,
    TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
