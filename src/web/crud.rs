//! Handlers shared by every resource: list, show, update, delete.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Map;
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{Model, Patch};

pub(super) fn documents<M: Model>(models: &[M]) -> ApiResult<Vec<Document>> {
    models
        .iter()
        .map(|model| model.to_document().map_err(ApiError::from))
        .collect()
}

/// Load a record or fail with 404
pub(super) fn fetch<M: Model>(app: &AppState, id: &str) -> ApiResult<M> {
    app.repo.get::<M>(id)?.ok_or(ApiError::NotFound)
}

pub(super) async fn list<M: Model>(State(app): State<Arc<AppState>>) -> ApiResult<Json<Vec<Document>>> {
    let models = app.repo.all::<M>()?;
    Ok(Json(documents(&models)?))
}

pub(super) async fn show<M: Model>(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    Ok(Json(fetch::<M>(&app, &id)?.to_document()?))
}

pub(super) async fn destroy<M: Model>(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    if !app.repo.delete::<M>(&id)? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted {} {}", M::KIND, id);
    Ok(Json(Map::new()))
}

/// Apply an allow-listed patch to a stored record. The record must exist
/// before the body is looked at.
pub(super) fn apply_update<M: Model, P: Patch<M>>(
    app: &AppState,
    id: &str,
    body: ApiResult<JsonBody>,
) -> ApiResult<M> {
    let mut model = fetch::<M>(app, id)?;
    let patch: P = body?.parse()?;
    patch.apply(&mut model);
    app.repo.save(&mut model)?;
    Ok(model)
}

pub(super) async fn update<M, P>(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: ApiResult<JsonBody>,
) -> ApiResult<Json<Document>>
where
    M: Model,
    P: Patch<M> + Send + 'static,
{
    let model = apply_update::<M, P>(&app, &id, body)?;
    Ok(Json(model.to_document()?))
}
