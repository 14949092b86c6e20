//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};
use crate::file::{FolderType, FolderUpdate, NewFolder};
use crate::web::error::ApiError;
use crate::ForgeError;

/// Folder creation request.
///
/// Every field is required. `maxFileLimit` must be a JSON integer.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderBody {
    /// Folder name, unique across folders.
    #[validate(required(message = "name is required"))]
    pub name: Option<String>,
    /// One of `csv`, `img`, `pdf`, `ppt`.
    #[serde(rename = "type")]
    #[validate(required(message = "type is required"))]
    pub folder_type: Option<String>,
    /// Advisory capacity, a positive integer.
    #[validate(
        required(message = "maxFileLimit is required"),
        range(min = 1, message = "maxFileLimit must be a positive integer")
    )]
    pub max_file_limit: Option<i64>,
}

impl TryFrom<CreateFolderBody> for NewFolder {
    type Error = ApiError;

    fn try_from(body: CreateFolderBody) -> Result<Self, Self::Error> {
        let invalid = || ApiError::bad_request("Invalid input data.");

        let name = body.name.ok_or_else(invalid)?;
        check_name(&name)?;

        let folder_type: FolderType = body
            .folder_type
            .ok_or_else(invalid)?
            .parse()
            .map_err(|e: ForgeError| invalid().with_error(e.to_string()))?;

        let max_file_limit = body.max_file_limit.ok_or_else(invalid)?;

        Ok(NewFolder::new(name, folder_type, max_file_limit))
    }
}

/// Folder update request. Absent fields keep their values; the type cannot change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderBody {
    /// New folder name.
    pub name: Option<String>,
    /// New advisory capacity.
    #[validate(range(min = 1, message = "maxFileLimit must be a positive integer"))]
    pub max_file_limit: Option<i64>,
}

impl TryFrom<UpdateFolderBody> for FolderUpdate {
    type Error = ApiError;

    fn try_from(body: UpdateFolderBody) -> Result<Self, Self::Error> {
        let mut update = FolderUpdate::new();
        if let Some(name) = body.name {
            check_name(&name)?;
            update = update.name(name);
        }
        if let Some(limit) = body.max_file_limit {
            update = update.max_file_limit(limit);
        }
        Ok(update)
    }
}

fn check_name(name: &str) -> Result<(), ApiError> {
    not_empty_trimmed(name)
        .and_then(|_| no_control_chars(name))
        .map_err(|e| {
            let detail = e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            ApiError::bad_request("Invalid input data.").with_error(format!("name: {detail}"))
        })
}

/// File description update request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDescriptionBody {
    /// New description; `null` or absent clears it.
    #[serde(default)]
    pub description: Option<String>,
}

/// Query for filtering files by mime type.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TypeQuery {
    /// Case-sensitive substring of the mime type.
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

/// Query for sorting files.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// `size` or `uploadedAt`.
    pub sort: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::error::ErrorCode;

    fn create_body(json: serde_json::Value) -> CreateFolderBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_folder_body_valid() {
        let body = create_body(serde_json::json!({
            "name": "Reports",
            "type": "pdf",
            "maxFileLimit": 5
        }));
        assert!(body.validate().is_ok());

        let folder = NewFolder::try_from(body).unwrap();
        assert_eq!(folder.name, "Reports");
        assert_eq!(folder.folder_type, FolderType::Pdf);
        assert_eq!(folder.max_file_limit, 5);
    }

    #[test]
    fn test_create_folder_body_missing_fields() {
        let body = create_body(serde_json::json!({ "name": "Reports" }));
        assert!(body.validate().is_err());
        assert!(NewFolder::try_from(body).is_err());
    }

    #[test]
    fn test_create_folder_body_rejects_non_positive_limit() {
        for limit in [0, -1] {
            let body = create_body(serde_json::json!({
                "name": "Reports",
                "type": "pdf",
                "maxFileLimit": limit
            }));
            assert!(body.validate().is_err());
        }
    }

    #[test]
    fn test_create_folder_body_rejects_string_limit() {
        let result = serde_json::from_value::<CreateFolderBody>(serde_json::json!({
            "name": "Reports",
            "type": "pdf",
            "maxFileLimit": "5"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_folder_body_unknown_type() {
        let body = create_body(serde_json::json!({
            "name": "Reports",
            "type": "docx",
            "maxFileLimit": 5
        }));
        assert!(body.validate().is_ok());
        let err = NewFolder::try_from(body).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[test]
    fn test_update_folder_body() {
        let body: UpdateFolderBody =
            serde_json::from_value(serde_json::json!({ "maxFileLimit": 3 })).unwrap();
        assert!(body.validate().is_ok());
        let update = FolderUpdate::try_from(body).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.max_file_limit, Some(3));

        let body: UpdateFolderBody =
            serde_json::from_value(serde_json::json!({ "name": "  " })).unwrap();
        assert!(FolderUpdate::try_from(body).is_err());

        let body: UpdateFolderBody =
            serde_json::from_value(serde_json::json!({ "maxFileLimit": 0 })).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_type_query_rename() {
        let query: TypeQuery = serde_json::from_value(serde_json::json!({ "type": "csv" })).unwrap();
        assert_eq!(query.file_type.as_deref(), Some("csv"));
    }
}
