//! HTTP service startup.
//!
//! Opens the database, rehydrates the [`ModuleStore`] from it, wires metrics
//! and serves [`build_router`] until Ctrl+C.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::RwLock;

use crate::api::{build_router, ApiState};
use crate::config::Config;
use crate::db::create_pool;
use crate::error::AppError;
use crate::metrics::AppMetrics;
use crate::repository::{ModuleRepository, SqliteModuleRepository};
use crate::store::ModuleStore;

/// Build the shared API state backed by `database_url`.
pub async fn build_state(database_url: &str) -> Result<ApiState, AppError> {
    let pool = create_pool(database_url).await?;
    let repository = Arc::new(SqliteModuleRepository::new(pool));

    let mut store = ModuleStore::new();
    store.restore(repository.list().await?);
    tracing::info!(modules = store.len(), "module store rehydrated");

    let metrics = AppMetrics::new()
        .map_err(|err| AppError::Config(format!("Failed to register metrics: {}", err)))?;
    metrics.modules_stored.set(store.len() as f64);

    Ok(ApiState {
        store: Arc::new(RwLock::new(store)),
        repository: Some(repository),
        metrics: Some(Arc::new(metrics)),
    })
}

/// Run the HTTP service until a shutdown signal arrives.
pub async fn serve(config: Config) -> Result<(), AppError> {
    let addr = config.socket_addr().map_err(AppError::Config)?;
    let state = build_state(&config.database_url).await?;
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, database_url = %config.database_url, "honours forecast service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutdown signal received. Stopping server.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_state_starts_empty_on_fresh_database() {
        let state = build_state("sqlite::memory:").await.unwrap();
        assert!(state.store.read().await.is_empty());
        assert!(state.repository.is_some());
        assert!(state.metrics.is_some());
    }
}
