//! HTTP API under `/api/v1`.
//!
//! Every resource follows the same shape: look the record up, validate the
//! body, mutate through the [`Repository`], return the JSON document.
//! Errors are reported as `{"error": "..."}` (see [`ApiError`]).

mod amenities;
mod cities;
mod crud;
mod error;
mod extract;
mod index;
mod place_amenities;
mod places;
mod reviews;
mod states;
mod users;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{Map, Value};
use tower_http::{normalize_path::NormalizePath, trace::TraceLayer};

pub use error::{ApiError, ApiResult};
pub use extract::JsonBody;

use crate::models::{
    Amenity, AmenityPatch, City, CityPatch, Place, Review, ReviewPatch, State, StatePatch, User,
    UserPatch,
};
use crate::repository::Repository;
use crud::{destroy, list, show, update};

/// A serialized record as returned to clients
pub type Document = Map<String, Value>;

/// The router behind trailing-slash trimming, as served
pub type App = NormalizePath<Router>;

/// Shared by all handlers
pub struct AppState {
    pub repo: Repository,
}

/// Build the application router (without CORS, which the binary adds)
pub fn router(repo: Repository) -> Router {
    let state = Arc::new(AppState { repo });

    let api = Router::new()
        .route("/status", get(index::status))
        .route("/stats", get(index::stats))
        .route("/states", get(list::<State>).post(states::create))
        .route(
            "/states/{state_id}",
            get(show::<State>)
                .put(update::<State, StatePatch>)
                .delete(destroy::<State>),
        )
        .route(
            "/states/{state_id}/cities",
            get(cities::list_by_state).post(cities::create),
        )
        .route(
            "/cities/{city_id}",
            get(show::<City>)
                .put(update::<City, CityPatch>)
                .delete(destroy::<City>),
        )
        .route("/amenities", get(list::<Amenity>).post(amenities::create))
        .route(
            "/amenities/{amenity_id}",
            get(show::<Amenity>)
                .put(update::<Amenity, AmenityPatch>)
                .delete(destroy::<Amenity>),
        )
        .route("/users", get(list::<User>).post(users::create))
        .route(
            "/users/{user_id}",
            get(show::<User>)
                .put(update::<User, UserPatch>)
                .delete(destroy::<User>),
        )
        .route(
            "/cities/{city_id}/places",
            get(places::list_by_city).post(places::create),
        )
        .route(
            "/places/{place_id}",
            get(places::show)
                .put(places::update)
                .delete(destroy::<Place>),
        )
        .route("/places_search", post(places::search))
        .route(
            "/places/{place_id}/reviews",
            get(reviews::list_by_place).post(reviews::create),
        )
        .route(
            "/reviews/{review_id}",
            get(show::<Review>)
                .put(update::<Review, ReviewPatch>)
                .delete(destroy::<Review>),
        )
        .route(
            "/places/{place_id}/amenities",
            get(place_amenities::list),
        )
        .route(
            "/places/{place_id}/amenities/{amenity_id}",
            post(place_amenities::link).delete(place_amenities::unlink),
        );

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap a finished router so `/states/` and `/states` reach the same route.
/// Trimming has to happen before routing, so this sits outside the `Router`.
pub fn app(router: Router) -> App {
    NormalizePath::trim_trailing_slash(router)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
