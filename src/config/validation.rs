//! Configuration validation.
//!
//! Serde handles the syntax; this module checks semantics and returns every
//! problem found, not just the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': not a socket address")]
    InvalidSocketAddr { field: &'static str, value: String },

    #[error("invalid upstream.base_url '{value}': {reason}")]
    InvalidUpstream { value: String, reason: String },

    #[error("invalid routes.prefix '{value}': {reason}")]
    InvalidPrefix { value: String, reason: &'static str },

    #[error("timeouts.{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("auth.token_cookie must not be empty")]
    EmptyCookieName,
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Err(reason) = check_upstream(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidUpstream {
            value: config.upstream.base_url.clone(),
            reason,
        });
    }

    if let Err(reason) = check_prefix(&config.routes.prefix) {
        errors.push(ValidationError::InvalidPrefix {
            value: config.routes.prefix.clone(),
            reason,
        });
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
        ("request_secs", config.timeouts.request_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if matches!(config.auth.token_cookie.as_deref(), Some(name) if name.trim().is_empty()) {
        errors.push(ValidationError::EmptyCookieName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    // The outbound connector speaks plain HTTP only.
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}

fn check_prefix(prefix: &str) -> Result<(), &'static str> {
    if !prefix.starts_with('/') {
        return Err("must start with '/'");
    }
    if prefix.ends_with('/') {
        return Err("must not end with '/'");
    }
    if prefix.contains(['{', '}', '*', ':', '?', '#']) {
        return Err("must be a literal path");
    }
    Ok(())
}
