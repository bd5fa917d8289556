//! path-mux server.
//!
//! Serves a route table from a TOML file through a segment-trie
//! multiplexer.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (trace, timeout) ──▶ ServeMux ──▶ matched handler
//!                                                  │            (literal first,
//!                                                  │             then :param)
//!                                                  └──▶ "Not found"
//!
//!     config file ──▶ watcher (--watch) ──▶ re-register into live ServeMux
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use path_mux::config::{load_config, ConfigWatcher};
use path_mux::observability::init_logging;
use path_mux::{HttpServer, MuxConfig, Shutdown};

#[derive(Parser)]
#[command(name = "path-mux")]
#[command(about = "Serve a slash-delimited route table with :param captures", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it the route table is empty.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Re-register routes whenever the configuration file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MuxConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability);

    tracing::info!("path-mux v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let (_watcher, config_updates) = match cli.config.as_deref().filter(|_| cli.watch) {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.trigger(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
