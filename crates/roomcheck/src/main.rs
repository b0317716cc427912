use std::sync::Arc;

use anyhow::Context;
use roomcheck::{create_router, AppState, ClassroomDbManager, Config, SeedData};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    info!("Opening classroom database at {}", config.database_path);
    let classroom_db = ClassroomDbManager::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;

    match &config.seed_path {
        Some(path) if !classroom_db.has_sections()? => {
            info!("Store is empty, seeding from {}", path.display());
            SeedData::load_from_file(path)?
                .apply(&classroom_db)
                .context("Failed to apply seed data")?;
        }
        Some(path) => info!("Store already has sections, skipping seed {}", path.display()),
        None => {
            if !classroom_db.has_sections()? {
                warn!("Store is empty and SEED_PATH is not set; every query will see no sections");
            }
        }
    }

    let address = config.bind_address();
    let app_state = Arc::new(AppState::new(config, classroom_db));
    let router = create_router(app_state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
