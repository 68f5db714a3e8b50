//! Console forwarding gateway.
//!
//! Sits between the management console and its backends, forwarding each
//! console API call to the right upstream and rewriting selected upstream
//! failures into answers the console can render.
//!
//! # Architecture Overview
//!
//! ```text
//!     Console Request
//!     ───────────────▶ http server ──▶ cors ──▶ routing table
//!                                                   │
//!                                                   ▼
//!                                   pipeline (server / bootstrap /
//!                                             main_user / monitor)
//!                                                   │
//!                           sanitize → resolve → forward ──▶ Polaris / Monitor
//!                                                   │
//!     Console Response                              ▼
//!     ◀─────────────── intercept / fallback ◀── upstream response
//! ```

use std::path::PathBuf;

use clap::Parser;

use console_gateway::config::{load_config, GatewayConfig};
use console_gateway::lifecycle::{self, Shutdown};
use console_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "console-gateway")]
#[command(about = "Forwarding gateway for the management console", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "console-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        polaris_server = %config.polaris_server.address,
        monitor_server = %config.monitor_server.address,
        main_user = config.web_server.owner(),
        "Configuration loaded"
    );

    let started = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_signal());

    started.server.run(started.listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
