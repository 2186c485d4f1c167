use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::error::ApiResult;
use super::AppState;
use crate::models::{Amenity, City, Place, Review, User};

pub(super) async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Number of records of each kind
pub(super) async fn stats(State(app): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let repo = &app.repo;
    Ok(Json(json!({
        "amenities": repo.count::<Amenity>()?,
        "cities": repo.count::<City>()?,
        "places": repo.count::<Place>()?,
        "reviews": repo.count::<Review>()?,
        "states": repo.count::<crate::models::State>()?,
        "users": repo.count::<User>()?,
    })))
}
