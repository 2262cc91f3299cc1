use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Envelope every endpoint answers with, success or not.
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    fn build(status: StatusCode, message: &str, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }

    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self::build(StatusCode::OK, "ok", data))
    }

    pub fn created(data: T) -> ApiResult<T> {
        Ok(Self::build(StatusCode::CREATED, "created", data))
    }
}

impl JsonApiResponse<Value> {
    /// Error envelope with `data: null`. Server errors are logged here.
    pub fn failure(status: StatusCode, message: &str) -> Self {
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = message, "request failed");
        }
        Self::build(status, message, Value::Null)
    }
}

/// Body for endpoints that only acknowledge an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        JsonApiResponse::failure(self.status_code(), self.message()).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
