use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use cardfolio_runtime::CoreError;

pub type AppSuccess = GenericResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl GenericResponse {
    pub fn new(status: StatusCode, message: &str, data: serde_json::Value) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }
}

impl IntoResponse for GenericResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json::from(self)).into_response()
    }
}

// Make our own error that wraps `anyhow::Error`.
#[derive(Debug)]
pub struct AppError(pub StatusCode, pub anyhow::Error);
impl AppError {
    pub fn new(status: StatusCode, err: anyhow::Error) -> Self {
        Self(status, err)
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::BAD_REQUEST,
        CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Upstream(_) | CoreError::Database(_) | CoreError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // the full chain goes to the logs, only the outermost message to the caller
        tracing::error!("CODE: {}, MESSAGE: {:#}", self.0.as_u16(), self.1);
        GenericResponse::new(self.0, &self.1.to_string(), json!({})).into_response()
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>` to turn them into
// `Result<_, AppError>`. Core errors pick their own status code.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        let status = err
            .downcast_ref::<CoreError>()
            .map(core_status)
            .unwrap_or(StatusCode::BAD_REQUEST);
        Self(status, err)
    }
}
