//! Prerender proxy binary.
//!
//! Classifies each inbound request and either serves a pre-rendered HTML
//! snapshot from the configured middleware (crawler page requests) or relays
//! the origin response untouched (everything else).

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prerender_proxy::config::{load_config, ProxyConfig};
use prerender_proxy::http::HttpServer;
use prerender_proxy::lifecycle::Shutdown;
use prerender_proxy::observability::metrics;

#[derive(Parser)]
#[command(name = "prerender-proxy")]
#[command(about = "Edge proxy serving prerendered HTML to crawlers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Initialize tracing subscriber; RUST_LOG overrides the configured level.
    let default_filter = format!(
        "prerender_proxy={0},tower_http={0}",
        config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.origin.address,
        prerender_base = %config.prerender.base_url,
        max_attempts = config.prerender.max_attempts,
        bot_agents = config.prerender.bot_agents.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(address) => metrics::init_metrics(address),
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
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
