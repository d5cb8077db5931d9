//! Tempo attendance server binary.

use std::net::SocketAddr;
use std::path::Path;

use shift_store::{LocalStore, ShiftStore, SqliteStore};
use tempo_server::{config::{Config, StorageBackend}, create_app, create_state, init_tracing};
use tracker::{Reconciler, Tracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!(storage = ?config.storage, "Starting Tempo server");

    match config.storage {
        StorageBackend::Sqlite => {
            let store = SqliteStore::connect(&config.database_url).await?;
            serve(config, store).await
        }
        StorageBackend::Local => {
            let store = LocalStore::new(Path::new(&config.data_dir)).await?;
            serve(config, store).await
        }
    }
}

async fn serve<S: ShiftStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let mut tracker = Tracker::new(std::sync::Arc::new(store));
    tracker.load().await?;

    let state = create_state(config.clone(), tracker);

    // Background staleness sweep over the shared engine.
    let reconciler =
        Reconciler::new(state.tracker.clone()).with_interval(config.sweep_interval_secs);
    reconciler.start();

    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
