//! HTTP API.
//!
//! [`build_router`] assembles every route with shared [`ApiState`]; the server
//! and the integration tests use the same assembly.

pub mod classification;
pub mod headers;
pub mod health;
pub mod modules;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::metrics::{metrics_handler, track_http, AppMetrics};
use crate::repository::ModuleRepository;
use crate::store::ModuleStore;

/// Shared state type for all module and classification routes.
pub type SharedState = Arc<ApiState>;

pub struct ApiState {
    pub store: Arc<RwLock<ModuleStore>>,
    /// Write-through persistence; `None` keeps modules in memory only.
    pub repository: Option<Arc<dyn ModuleRepository + Send + Sync>>,
    pub metrics: Option<Arc<AppMetrics>>,
}

impl ApiState {
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(RwLock::new(ModuleStore::new())),
            repository: None,
            metrics: None,
        }
    }
}

/// Routes served under [`SharedState`].
pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/modules",
            get(modules::list_modules).post(modules::create_module),
        )
        .route("/modules/credits", get(modules::credits))
        .route(
            "/modules/:id",
            put(modules::update_module).delete(modules::delete_module),
        )
        .route("/classification", get(classification::stored_forecast))
        .route("/classify", post(classification::classify_modules))
        .with_state(state)
}

/// Full application router: API routes, health, metrics, CORS and request
/// metrics middleware.
pub fn build_router(state: SharedState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health))
        .merge(api_router(state.clone()));

    if let Some(metrics) = state.metrics.clone() {
        app = app
            .merge(
                Router::new()
                    .route("/metrics", get(metrics_handler))
                    .with_state(metrics.clone()),
            )
            .layer(middleware::from_fn_with_state(metrics, track_http));
    }

    app.layer(CorsLayer::permissive())
}
