//! Repository bridge service.
//!
//! Loads configuration, registers the bridge on its bus address, serves the
//! HTTP ingress and runs until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use repo_bridge::config::{load_config, BridgeConfig};
use repo_bridge::lifecycle::{self, signals, Shutdown};
use repo_bridge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "repo-bridge")]
#[command(about = "Forwards bus requests to an HTTP repository", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("repo-bridge v{} starting", env!("CARGO_PKG_VERSION"));

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

    let shutdown = Shutdown::new();
    let running = lifecycle::start(config, &shutdown).await?;
    if let Some(addr) = running.ingress_addr() {
        tracing::info!(address = %addr, "Ingress listening");
    }

    signals::wait_for_signal().await;
    shutdown.trigger();
    running.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
