//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use mynah_core::error::MynahError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from mynah-core errors
impl From<MynahError> for ApiError {
    fn from(err: MynahError) -> Self {
        let code = err.code().as_str();
        match err {
            MynahError::ConfigurationMissing { .. }
            | MynahError::Configuration(_)
            | MynahError::UnsupportedProvider { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, code, err.to_string())
            }
            MynahError::Authentication { message, .. } => ApiError::unauthorized(message),
            MynahError::RateLimit { message, .. } => ApiError::rate_limit(message),
            MynahError::Timeout { .. } => {
                ApiError::new(StatusCode::GATEWAY_TIMEOUT, code, err.to_string())
            }
            MynahError::Llm { .. } => ApiError::new(StatusCode::BAD_GATEWAY, code, err.to_string()),
            MynahError::Store { .. }
            | MynahError::Io(_)
            | MynahError::Serialization(_)
            | MynahError::Internal(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
            }
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
