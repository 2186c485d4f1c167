use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::crud::{documents, fetch};
use super::error::ApiResult;
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{self, City, Model, NewCity};

pub(super) async fn list_by_state(
    State(app): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let state = fetch::<models::State>(&app, &state_id)?;
    Ok(Json(documents(&app.repo.cities_of(state.id())?)?))
}

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    Path(state_id): Path<String>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let state = fetch::<models::State>(&app, &state_id)?;
    let body = body?;
    body.require("name")?;

    let new = body.parse::<NewCity>()?;
    let city = app.repo.insert(City::new(state.id(), new.name))?;
    info!("Created city {} in state {}", city.id(), state.id());
    Ok((StatusCode::CREATED, Json(city.to_document()?)))
}
