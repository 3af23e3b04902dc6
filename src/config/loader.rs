//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Environment variables that override file values.
pub const ENV_BIND_ADDRESS: &str = "FORWARDER_BIND_ADDRESS";
pub const ENV_UPSTREAM_URL: &str = "FORWARDER_UPSTREAM_URL";
pub const ENV_PREFIX: &str = "FORWARDER_PREFIX";
pub const ENV_LOG_LEVEL: &str = "FORWARDER_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read configuration from a TOML file. Not validated: later layers may
/// still override what the file says.
pub fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Takes the lookup as a closure so callers can pass `std::env::var` or a
/// fixed table.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.base_url = v;
    }
    if let Some(v) = lookup(ENV_PREFIX) {
        config.routes.prefix = v;
    }
    if let Some(v) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = v;
    }
}

/// Resolve configuration from defaults, then the optional file, then the
/// process environment. Callers validate once every override is applied.
pub fn resolve_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}
