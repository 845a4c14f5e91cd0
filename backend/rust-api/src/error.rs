use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error surface of the quiz core.
///
/// Everything a handler can fail with maps onto one of three client-visible
/// outcomes: the resource does not exist (404), the request named something
/// invalid (400, with the offending field), or a storage backend is down
/// (500, retryable).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid `{field}`: {message}")]
    Validation { field: String, message: String },
    #[error("storage unavailable: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Storage(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Storage(err) = &self {
            tracing::error!("storage failure: {:#}", err);
        }

        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
