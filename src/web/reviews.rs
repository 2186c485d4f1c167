use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::crud::{documents, fetch};
use super::error::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{Model, NewReview, Place, Review, User};

pub(super) async fn list_by_place(
    State(app): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let place = fetch::<Place>(&app, &place_id)?;
    Ok(Json(documents(&app.repo.reviews_of(place.id())?)?))
}

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let place = fetch::<Place>(&app, &place_id)?;
    let body = body?;
    let user_id = body.require("user_id")?.as_str().ok_or(ApiError::NotFound)?;
    fetch::<User>(&app, user_id)?;
    body.require("text")?;

    let new = body.parse::<NewReview>()?;
    let review = app
        .repo
        .insert(Review::new(place.id(), new.user_id, new.text))?;
    info!("Created review {} for place {}", review.id(), place.id());
    Ok((StatusCode::CREATED, Json(review.to_document()?)))
}
