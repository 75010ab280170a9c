//! hashed-urls server.
//!
//! Fronts a dataset server so that immutable datasets are reachable under
//! hash-bearing URLs a CDN can cache forever.
//!
//! ```text
//!   client ──▶ request id ──▶ trace ──▶ hashed_urls ──▶ upstream forwarder ──▶ dataset server
//!                                          │
//!                                          └─▶ 302 /{name}-{token}... (stale or missing token)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;

use hashed_urls::config::{load_config, HashedUrlsConfig};
use hashed_urls::lifecycle::{self, signals, Shutdown};
use hashed_urls::observability::{logging, metrics};
use hashed_urls::HttpServer;

#[derive(Parser)]
#[command(name = "hashed-urls")]
#[command(about = "Serve immutable datasets under content-hashed URLs", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default)
    Serve,
    /// Print the registered dataset routes and exit
    Routes,
}

#[derive(Serialize)]
struct RouteEntry<'a> {
    name: &'a str,
    route: &'a str,
    token: Option<&'a str>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HashedUrlsConfig::default(),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => print_routes(&config),
        Commands::Serve => serve(config).await,
    }
}

fn print_routes(config: &HashedUrlsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let prepared = lifecycle::prepare(config)?;
    let entries: Vec<_> = prepared
        .catalog
        .iter()
        .map(|d| RouteEntry {
            name: d.name(),
            route: d.route(),
            token: prepared.registry.token(d.name()),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

async fn serve(config: HashedUrlsConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&config.observability.log_level);

    tracing::info!("hashed-urls v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        max_age = config.hashed_urls.max_age,
        cache_on_errors = config.hashed_urls.cache_on_errors,
        datasets = config.datasets.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Registration happens here, before the listener is bound.
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::forward_signals(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
