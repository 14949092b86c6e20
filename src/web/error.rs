//! API error handling for the FileForge HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ForgeError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
    /// Underlying error text (server errors and field validation only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    error: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error: None,
        }
    }

    /// Attach underlying error text.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error carrying the underlying error text.
    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, "Server error").with_error(error)
    }

    /// Create a validation error from validator::ValidationErrors.
    ///
    /// Field messages are joined into the `error` field, sorted by field name.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{field}: {message}")
                })
            })
            .collect();
        messages.sort();

        Self::bad_request("Invalid input data.").with_error(messages.join("; "))
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            message: self.message,
            error: self.error,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ForgeError> for ApiError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::Validation(msg) => ApiError::bad_request(msg),
            ForgeError::NotFound(_) => ApiError::not_found(err.to_string()),
            ForgeError::Conflict(msg) => ApiError::conflict(msg),
            ForgeError::PayloadTooLarge(msg) => ApiError::payload_too_large(msg),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_forge_error() {
        let err: ApiError = ForgeError::Validation("bad type".to_string()).into();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.message(), "bad type");

        let err: ApiError = ForgeError::NotFound("Folder".to_string()).into();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Folder not found");

        let err: ApiError = ForgeError::Conflict("Folder name must be unique.".to_string()).into();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Folder name must be unique.");

        let err: ApiError = ForgeError::PayloadTooLarge("too big".to_string()).into();
        assert_eq!(err.code(), ErrorCode::PayloadTooLarge);
    }

    #[test]
    fn test_internal_error_keeps_underlying_text() {
        let err: ApiError = ForgeError::Database("disk I/O error".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Server error");
        assert!(err.error.as_deref().unwrap().contains("disk I/O error"));
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let mut errors = validator::ValidationErrors::new();
        errors.add(
            "maxFileLimit",
            validator::ValidationError::new("range").with_message("must be positive".into()),
        );

        let err = ApiError::from_validation_errors(errors);
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.message(), "Invalid input data.");
        assert_eq!(err.error.as_deref(), Some("maxFileLimit: must be positive"));
    }
}
