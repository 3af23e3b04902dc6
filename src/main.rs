//! Same-origin API forwarder.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser / SSR                  api-forwarder                      Upstream API
//!   ─────────────                  ─────────────                      ────────────
//!   GET /api/proxy/a/b?q=1 ──▶ ┌──────────────────────────┐
//!                              │ http::server (axum)      │
//!                              │  request id, trace,      │
//!                              │  request timeout         │
//!                              └───────────┬──────────────┘
//!                                          ▼
//!                              ┌──────────────────────────┐
//!                              │ proxy::Forwarder         │   GET /a/b?q=1
//!                              │  target + header strip   │ ──────────────────▶
//!                              │  single call, deadline   │ ◀──────────────────
//!                              │  JSON re-encode / raw    │   status+headers+body
//!                              └───────────┬──────────────┘
//!   status+headers+body  ◀─────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use api_forwarder::config::{resolve_config, validate_config, ConfigError, ProxyConfig};
use api_forwarder::http::HttpServer;
use api_forwarder::lifecycle::{spawn_signal_listener, Shutdown};
use api_forwarder::observability::{init_logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "api-forwarder")]
#[command(about = "Forwards /api/proxy/* to a fixed upstream REST backend", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "FORWARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address, e.g. 0.0.0.0:3000
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the upstream base URL, e.g. http://127.0.0.1:3018/
    #[arg(short, long)]
    upstream: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<ProxyConfig, ConfigError> {
        let mut config = resolve_config(self.config.as_deref())?;
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.base_url = upstream.clone();
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    init_logging(&config.observability.log_level)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        prefix = %config.routes.prefix,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
