//! Response types for the HR engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 401 for a request without a usable caller identity.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHORIZED", message),
        }
    }

    /// A 403 for a caller whose role does not allow the operation.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            error: ApiError::new("FORBIDDEN", message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::InvalidRange { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_RANGE",
                    message,
                    "The end date must be on or after the start date",
                ),
            ),
            EngineError::DuplicateCheckIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_CHECK_IN", message),
            ),
            EngineError::NoActiveCheckIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("NO_ACTIVE_CHECK_IN", message),
            ),
            EngineError::CheckOutBeforeCheckIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("CHECK_OUT_BEFORE_CHECK_IN", message),
            ),
            EngineError::AlreadyReviewed { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_REVIEWED", message),
            ),
            EngineError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            EngineError::InvalidInput { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
            EngineError::Storage { transient, .. } => (
                if transient {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
