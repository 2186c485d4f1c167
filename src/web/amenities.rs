use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::error::ApiResult;
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{Amenity, Model, NewAmenity};

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let body = body?;
    body.require("name")?;

    let amenity = app.repo.insert(Amenity::from(body.parse::<NewAmenity>()?))?;
    info!("Created amenity {}", amenity.id());
    Ok((StatusCode::CREATED, Json(amenity.to_document()?)))
}
