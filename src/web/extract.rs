use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;

/// A JSON object request body.
///
/// Anything that is not `application/json` holding an object is rejected
/// with [`ApiError::NotJson`]. Handlers that must check a parent resource
/// first take `Result<JsonBody, ApiError>` and surface the rejection later.
#[derive(Debug)]
pub struct JsonBody(pub Map<String, Value>);

impl JsonBody {
    /// Fail with `Missing <field>` unless the key is present
    pub fn require(&self, field: &'static str) -> Result<&Value, ApiError> {
        self.0.get(field).ok_or(ApiError::Missing(field))
    }

    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.0)).map_err(|e| ApiError::Invalid(e.to_string()))
    }
}

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) => Ok(JsonBody(map)),
            _ => Err(ApiError::NotJson),
        }
    }
}
