use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use popcorn_core::{
    load_config, validate_config, KeyValueStore, MovieApi, OmdbClient, PopcornController,
    SqliteKeyValueStore, WatchlistStore,
};
use popcorn_server::api::create_router;
use popcorn_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("POPCORN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Storage path: {:?}", config.storage.path);
    info!("Duplicate policy: {:?}", config.watchlist.duplicates);

    // Open storage and load the watchlist
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        SqliteKeyValueStore::new(&config.storage.path).context("Failed to open storage")?,
    );
    let watchlist = WatchlistStore::load(
        storage,
        config.storage.watchlist_key.clone(),
        config.watchlist.duplicates,
    );

    // Upstream movie API
    let api: Arc<dyn MovieApi> =
        Arc::new(OmdbClient::new(config.omdb.clone()).context("Failed to create OMDb client")?);
    info!("OMDb client initialized");

    let controller = Arc::new(PopcornController::new(api, watchlist));

    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&controller)));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    if controller.snapshot().watchlist_dirty {
        match controller.flush_watchlist() {
            Ok(()) => info!("Flushed pending watchlist changes"),
            Err(e) => warn!("Watchlist changes not persisted: {}", e),
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
