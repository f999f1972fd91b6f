//! HTTP entry point for the name generation service.

mod server;

use clap::Parser;
use namesmith::{LinearModel, PredictiveModel, RankTable, Scorer, SessionStore};
use server::config::{CliArgs, ServerConfig};
use server::routes::{self, AppState};
use server::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry();

    let (scorer, known_names) = load_scorer(&config);
    let store = Arc::new(SessionStore::new(Arc::new(scorer), config.limits));
    tokio::spawn(Arc::clone(&store).run_sweeper(config.sweep_interval));

    let state = AppState {
        store: Arc::clone(&store),
        known_names,
    };
    let app = routes::router(state);

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!(
        addr = %config.server_addr,
        known_names,
        "name service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(store))
        .await?;

    tracing::info!("service shut down successfully");
    Ok(())
}

/// Builds the scorer from configured artifacts.
///
/// Artifact failures are not fatal: a missing or unreadable table leaves
/// the table sparse, and a missing model starts the scorer in degraded
/// mode. The service keeps serving either way.
fn load_scorer(config: &ServerConfig) -> (Scorer, usize) {
    let mut table = RankTable::new();

    if let Some(path) = &config.names_path {
        if let Err(e) = table.merge_ranks_file(path) {
            tracing::warn!("could not load historical ranks: {e}");
        }
    }
    if let Some(path) = &config.flagged_path {
        if let Err(e) = table.merge_flagged_file(path) {
            tracing::warn!("could not load flagged words: {e}");
        }
    }

    let model: Option<Arc<dyn PredictiveModel>> = match &config.model_path {
        Some(path) => match LinearModel::from_file(path) {
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                tracing::warn!("could not load model, scoring degraded: {e}");
                None
            }
        },
        None => None,
    };

    let known_names = table.len();
    (Scorer::new(model, Arc::new(table)), known_names)
}

async fn shutdown_signal(store: Arc<SessionStore>) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
    store.shutdown();
}
