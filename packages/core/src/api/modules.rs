//! CRUD endpoints for the student's module list.
//!
//! Routes:
//! - `GET    /modules`          - list modules in insertion order
//! - `POST   /modules`          - add a module
//! - `PUT    /modules/:id`      - replace a module's fields
//! - `DELETE /modules/:id`      - remove a module
//! - `GET    /modules/credits`  - level 2 / level 3 / total credit breakdown
//!
//! Every mutation is validated before it touches the store and written
//! through to the repository (when one is configured) before it is applied.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::SharedState;
use crate::classification::{CreditBreakdown, ModuleError};
use crate::error::AppError;
use crate::store::{ModuleInput, StoredModule};

fn refresh_gauge(state: &SharedState, stored: usize) {
    if let Some(metrics) = state.metrics.as_ref() {
        metrics.modules_stored.set(stored as f64);
    }
}

/// `GET /modules` - list all modules.
pub async fn list_modules(State(state): State<SharedState>) -> Json<Vec<StoredModule>> {
    let store = state.store.read().await;
    Json(store.list().to_vec())
}

/// `POST /modules` - validate and add a module.
pub async fn create_module(
    State(state): State<SharedState>,
    payload: Result<Json<ModuleInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredModule>), AppError> {
    let Json(body) = payload?;
    let fields = body.validate()?;

    let mut store = state.store.write().await;
    let module = store.stage_new(fields);
    if let Some(repo) = state.repository.as_ref() {
        repo.insert(&module).await?;
    }
    store.commit(module.clone());
    refresh_gauge(&state, store.len());

    tracing::info!(id = module.id, name = %module.name, "module added");
    Ok((StatusCode::CREATED, Json(module)))
}

/// `PUT /modules/:id` - replace all fields of an existing module.
pub async fn update_module(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<ModuleInput>, JsonRejection>,
) -> Result<Json<StoredModule>, AppError> {
    let Json(body) = payload?;
    let fields = body.validate()?;

    let mut store = state.store.write().await;
    let module = store.stage_update(id, fields)?;
    if let Some(repo) = state.repository.as_ref() {
        if !repo.update(&module).await? {
            return Err(ModuleError::not_found(id).into());
        }
    }
    store.commit(module.clone());

    tracing::info!(id, "module updated");
    Ok(Json(module))
}

/// `DELETE /modules/:id` - remove a module.
pub async fn delete_module(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.write().await;
    if store.get(id).is_none() {
        return Err(ModuleError::not_found(id).into());
    }
    if let Some(repo) = state.repository.as_ref() {
        repo.delete(id).await?;
    }
    store.remove(id)?;
    refresh_gauge(&state, store.len());

    tracing::info!(id, "module removed");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /modules/credits` - credit totals per level.
pub async fn credits(State(state): State<SharedState>) -> Json<CreditBreakdown> {
    let store = state.store.read().await;
    Json(store.credits_by_level())
}
