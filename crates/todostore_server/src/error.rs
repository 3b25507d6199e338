//! Centralized error-to-response mapping for the HTTP surface.
//!
//! # Responsibility
//! - Map the core error taxonomy onto HTTP status codes.
//! - Render every failure as a `{"errorMessage": ...}` body.
//!
//! # Invariants
//! - Validation and malformed-body failures map to 400.
//! - Unknown todo ids map to 404.
//! - Store and consistency failures map to 500 without leaking SQL detail
//!   beyond the error's own message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{info, warn};
use todostore_core::{StoreError, TodoServiceError};

/// HTTP-facing error for all todo endpoints.
#[derive(Debug)]
pub enum ApiError {
    /// Input violates the todo value rules.
    Validation(String),
    /// Target todo does not exist.
    NotFound,
    /// Request body could not be read as the expected JSON shape.
    BadRequest(String),
    /// Store or internal failure.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(message) | Self::BadRequest(message) | Self::Internal(message) => {
                message.clone()
            }
            Self::NotFound => "todo item not found".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_client_error() {
            info!(
                "event=request_rejected module=http status=error code={} message={}",
                status.as_u16(),
                message
            );
        } else {
            warn!(
                "event=request_failed module=http status=error code={} message={}",
                status.as_u16(),
                message
            );
        }

        let body = serde_json::json!({ "errorMessage": message });
        (status, Json(body)).into_response()
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            TodoServiceError::Validation(err) => Self::Validation(err.to_string()),
            TodoServiceError::TodoNotFound(_) => Self::NotFound,
            TodoServiceError::Store(err) => Self::Internal(err.to_string()),
            TodoServiceError::InconsistentState(details) => Self::Internal(details.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}
