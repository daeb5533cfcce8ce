//! JSON:API include gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │               INCLUDE GATEWAY                │
//!   Client Request       │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!   ─────────────────────┼─▶│  http    │──▶│  include  │──▶│  proxy   │─┼──▶ JSON:API
//!                        │  │  server  │   │middleware │   │ handler  │ │    upstream
//!                        │  └──────────┘   └─────┬─────┘   └──────────┘ │
//!                        │                       │                      │
//!                        │         ┌─────────────┼──────────────┐       │
//!                        │         ▼             ▼              ▼       │
//!                        │    ┌─────────┐  ┌──────────┐  ┌───────────┐  │
//!                        │    │ routing │  │ includes │  │  config   │  │
//!                        │    │ matcher │  │  table   │  │ (prefix)  │  │
//!                        │    └─────────┘  └──────────┘  └───────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use jsonapi_include_proxy::config::watcher::ConfigWatcher;
use jsonapi_include_proxy::config::SharedConfig;
use jsonapi_include_proxy::http::HttpServer;
use jsonapi_include_proxy::lifecycle::{build_table, load_configuration, Shutdown};
use jsonapi_include_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "jsonapi-include-proxy")]
#[command(about = "Injects JSON:API include parameters in front of a JSON:API server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate configuration and include table, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_configuration(cli.config.as_deref())?;
    logging::init_logging(&config.observability.log_level);

    tracing::info!("jsonapi-include-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let table = build_table(&config, cli.config.as_deref())?;

    if cli.check {
        println!(
            "configuration ok: path_prefix={:?}, {} include entries",
            config.jsonapi.path_prefix,
            table.len()
        );
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Hot reload; the watcher handle must outlive the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shared = SharedConfig::new(config);
    let server = HttpServer::new(shared, Arc::new(table));

    let shutdown = Shutdown::new();
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
