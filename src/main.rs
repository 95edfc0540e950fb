//! # Watchlist Screening Server Driver
//!
//! ## Purpose
//! Main entry point for the screening server. Wires the store, refresh
//! loader, and match engine together, starts the periodic refresh task, and
//! serves the search API.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file, command line arguments, environment
//!   variables
//! - **Output**: Running web server with screening endpoints
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the store, refresh loader, and match engine
//! 4. Spawn the periodic refresh task
//! 5. Start the API server
//! 6. Handle shutdown signals gracefully

use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use watchlist_screening::{
    api::ApiServer, config::Config, engine::MatchEngine, errors::Result, refresh::RefreshLoader,
    store::WatchlistStore, AppState,
};

/// Sanctions watchlist screening server
#[derive(Parser, Debug)]
#[command(name = "watchlist-screening-server", version, about)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Server port override
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config);

    info!("Starting watchlist screening server");
    info!("Configuration loaded from: {}", args.config);

    // Build components
    let store = Arc::new(WatchlistStore::new());
    let loader = Arc::new(RefreshLoader::new(config.watchlist.clone(), store.clone())?);
    let engine = Arc::new(MatchEngine::new(store.clone(), loader.clone()));

    // Spawn the periodic refresh task; the first tick fires immediately
    let scheduler_handle = loader.clone().spawn_scheduler();
    info!(
        "Scheduled watchlist refresh every {}s from {}",
        config.watchlist.refresh_interval_secs, config.watchlist.source
    );

    let app_state = AppState {
        config: config.clone(),
        engine,
        store,
    };

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!("Server error: {}", e);
        }
    });

    info!(
        "Watchlist screening server started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    scheduler_handle.abort();
    info!("Watchlist screening server shut down successfully");

    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Logging initialized with level: {}", config.logging.level);
}
