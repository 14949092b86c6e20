//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// The body is deserialized as JSON and then checked with the `validator`
/// crate. Type mismatches (such as `"5"` where a number is expected) and
/// failed rules both produce a 400 response.
///
/// # Example
///
/// ```ignore
/// use fileforge::web::dto::ValidatedJson;
///
/// async fn create_folder(
///     ValidatedJson(body): ValidatedJson<CreateFolderBody>,
/// ) -> Result<Json<FolderMessageResponse>, ApiError> {
///     // body is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request("Invalid input data.").with_error(e.body_text()))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().any(|c| c.is_control()) {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_control_chars() {
        assert!(no_control_chars("Quarterly Reports").is_ok());
        assert!(no_control_chars("Hello\x00World").is_err());
        assert!(no_control_chars("Line 1\nLine 2").is_err());
    }

    #[test]
    fn test_not_empty_trimmed() {
        assert!(not_empty_trimmed("Reports").is_ok());
        assert!(not_empty_trimmed("  Reports  ").is_ok());
        assert!(not_empty_trimmed("").is_err());
        assert!(not_empty_trimmed(" \t").is_err());
    }
}
