use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::error::ApiResult;
use super::extract::JsonBody;
use super::{AppState, Document};
use crate::models::{Model, NewUser, User};

pub(super) async fn create(
    State(app): State<Arc<AppState>>,
    body: ApiResult<JsonBody>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let body = body?;
    body.require("email")?;
    body.require("password")?;

    let user = app.repo.insert(User::from(body.parse::<NewUser>()?))?;
    info!("Created user {}", user.id());
    Ok((StatusCode::CREATED, Json(user.to_document()?)))
}
