use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{MemoryStore, PgStore, Store};

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let store: Arc<dyn Store> = match config.database.url.as_deref() {
        Some(url) => Arc::new(
            PgStore::connect(url, &config.database)
                .await
                .context("failed to connect to PostgreSQL")?,
        ),
        None => {
            warn!("DATABASE_URL not set, records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    info!(
        "Starting in {:?} mode with {} store",
        config.environment,
        store.backend_name()
    );

    let router = app(AppState::new(config, store));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
