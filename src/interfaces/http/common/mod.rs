//! Shared HTTP types: the error payload and the request extractors.

pub mod params;
pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use params::{ApiPath, ApiQuery, ParamsRejection};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Short, stable summary (e.g. "Not found")
    pub message: String,
    /// Human-readable detail for this failure
    pub detailed_message: String,
    /// Server local time of the failure
    #[schema(value_type = String, example = "2024-06-01T12:00:00")]
    pub error_time: NaiveDateTime,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, detailed_message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detailed_message: detailed_message.into(),
            error_time: chrono::Local::now().naive_local(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// HTTP status for a domain error.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let (message, detail) = match &self {
            DomainError::NotFound { .. } => ("Entity not found", self.to_string()),
            DomainError::Validation(msg) => ("Bad request", msg.clone()),
            DomainError::InvalidState(msg) => ("Operation not permitted", msg.clone()),
            DomainError::Storage(msg) => {
                error!(error = %msg, "Storage failure while serving request");
                ("Internal server error", "Storage backend failure".to_string())
            }
        };
        ErrorResponse::new(message, detail).into_response_with(status)
    }
}
