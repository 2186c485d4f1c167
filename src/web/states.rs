use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::error::ApiResult;
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{self, Model, NewState};

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let body = body?;
    body.require("name")?;

    let state = app.repo.insert(models::State::from(body.parse::<NewState>()?))?;
    info!("Created state {}", state.id());
    Ok((StatusCode::CREATED, Json(state.to_document()?)))
}
