use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use super::crud::{apply_update, fetch};
use super::error::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{City, Model, NewPlace, Place, PlacePatch, User};
use crate::search::{PlaceFilter, PlaceFilterResolver, PlaceHit};

/// Place document with its amenity ids
fn detailed(app: &AppState, place: Place) -> ApiResult<Document> {
    let amenities = app.repo.amenity_ids(&place)?;
    let hit = PlaceHit {
        place,
        amenities: Some(amenities),
    };
    Ok(hit.to_document()?)
}

pub(super) async fn list_by_city(
    State(app): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let city = fetch::<City>(&app, &city_id)?;
    let places = app
        .repo
        .places_of(city.id())?
        .into_iter()
        .map(|place| detailed(&app, place))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(places))
}

pub(super) async fn show(
    State(app): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<Json<Document>> {
    let place = fetch::<Place>(&app, &place_id)?;
    Ok(Json(detailed(&app, place)?))
}

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    Path(city_id): Path<String>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let city = fetch::<City>(&app, &city_id)?;
    let body = body?;
    let user_id = body.require("user_id")?.as_str().ok_or(ApiError::NotFound)?;
    fetch::<User>(&app, user_id)?;
    body.require("name")?;

    let place = app
        .repo
        .insert(body.parse::<NewPlace>()?.into_place(city.id()))?;
    info!("Created place {} in city {}", place.id(), city.id());
    Ok((StatusCode::CREATED, Json(detailed(&app, place)?)))
}

pub(super) async fn update(
    State(app): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: ApiResult<JsonBody>,
) -> ApiResult<Json<Document>> {
    let place = apply_update::<Place, PlacePatch>(&app, &place_id, body)?;
    Ok(Json(detailed(&app, place)?))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// An empty body or `null` means no constraint at all. Anything else must be
/// sent as `application/json`.
fn parse_filter(headers: &HeaderMap, body: &[u8]) -> ApiResult<PlaceFilter> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PlaceFilter::default());
    }
    if !is_json(headers) {
        return Err(ApiError::NotJson);
    }

    match serde_json::from_slice::<Value>(body).map_err(|_| ApiError::NotJson)? {
        Value::Null => Ok(PlaceFilter::default()),
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| ApiError::Invalid(e.to_string()))
        }
        _ => Err(ApiError::NotJson),
    }
}

pub(super) async fn search(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = parse_filter(&headers, &body)?;
    debug!("Place search: {:?}", filter);

    let hits = PlaceFilterResolver::new(&app.repo).resolve(&filter)?;
    let documents = hits
        .iter()
        .map(|hit| hit.to_document().map_err(ApiError::from))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(documents))
}
