//! Store proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace span ─▶ CORS ─▶ route handler
//!                                                          │
//!                        ┌─────────────────────────────────┤
//!                        │ guard(operation)                │
//!                        │   identity (bearer user id)     │
//!                        │   body parser → validators      │
//!                        │   store client ─────────────────┼──▶ upstream REST API
//!                        │   reshape                       │
//!                        └─────────────────────────────────┘
//!     Client Response
//!     ◀────────────── JSON body, or {"detail": ...} on failure
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use store_proxy::config::{load_config, validation::validate_config, ConfigError, ProxyConfig};
use store_proxy::lifecycle::{wait_for_shutdown, Shutdown};
use store_proxy::observability::{logging, metrics};
use store_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "store-proxy", version)]
#[command(about = "HTTP proxy for the store cart and product API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "STORE_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.base_url
    #[arg(long)]
    upstream: Option<String>,
}

fn resolve_config(args: &Args) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(upstream) = &args.upstream {
        config.upstream.base_url = upstream.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init(&config.observability.log_level);

    tracing::info!("store-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        override_created_id = config.carts.override_created_id,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_shutdown().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
