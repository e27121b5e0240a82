//! Atlas Server Binary
//!
//! Catalog query service with hierarchical domain access and cursor
//! pagination.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! atlas-server --config config.yaml
//!
//! # With environment variables only
//! ATLAS_SERVER__PORT=9090 atlas-server
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use atlas_api::config::ServerConfig;
use atlas_api::http::{create_router, AppState};
use atlas_api::observability::logging::parse_log_level;
use atlas_api::observability::{init_logging, LoggingConfig};
use atlas_storage::MemoryCatalogStore;

/// Atlas - catalog query service
#[derive(Parser, Debug)]
#[command(name = "atlas-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    // Initialize logging
    init_logging(LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Atlas server");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    match config.storage.backend.as_str() {
        "memory" => {
            info!("Using in-memory storage backend");
            let storage = Arc::new(MemoryCatalogStore::new());
            let state = AppState::new(storage);
            let router = create_router(state);
            run_http_server(router, addr).await
        }
        other => {
            error!("Unknown storage backend: {}", other);
            anyhow::bail!("Unknown storage backend: {}", other);
        }
    }
}

/// Run the HTTP server with graceful shutdown.
async fn run_http_server(router: axum::Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!(%addr, "HTTP server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_parsing() {
        let args = Args::try_parse_from(["atlas-server"]).unwrap();
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["atlas-server", "--config", "config.yaml"]).unwrap();
        assert_eq!(args.config, Some("config.yaml".to_string()));

        let args = Args::try_parse_from(["atlas-server", "-c", "test.yaml"]).unwrap();
        assert_eq!(args.config, Some("test.yaml".to_string()));
    }
}
