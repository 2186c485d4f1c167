use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Map;
use tracing::info;

use super::crud::{documents, fetch};
use super::error::{ApiError, ApiResult};
use super::{AppState, Document};
use crate::models::{Amenity, Model, Place};

pub(super) async fn list(
    State(app): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let place = fetch::<Place>(&app, &place_id)?;
    Ok(Json(documents(&app.repo.amenities_of(&place)?)?))
}

/// 201 when the link is new, 200 when it already existed
pub(super) async fn link(
    State(app): State<Arc<AppState>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let mut place = fetch::<Place>(&app, &place_id)?;
    let amenity = fetch::<Amenity>(&app, &amenity_id)?;

    let status = if app.repo.link_amenity(&mut place, amenity.id())? {
        info!("Linked amenity {} to place {}", amenity.id(), place.id());
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(amenity.to_document()?)))
}

pub(super) async fn unlink(
    State(app): State<Arc<AppState>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<Json<Document>> {
    let mut place = fetch::<Place>(&app, &place_id)?;
    let amenity = fetch::<Amenity>(&app, &amenity_id)?;

    if !app.repo.unlink_amenity(&mut place, amenity.id())? {
        return Err(ApiError::NotFound);
    }
    info!("Unlinked amenity {} from place {}", amenity.id(), place.id());
    Ok(Json(Map::new()))
}
