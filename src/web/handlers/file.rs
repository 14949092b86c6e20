//! File handlers for Web API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::file::{UploadRequest, UploadedFile};
use crate::web::dto::{
    FileMessageResponse, FileMetadataResponse, FileResponse, MessageResponse, SortQuery,
    TypeQuery, UpdateDescriptionBody, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// Map a multipart read failure, keeping the body-limit status.
fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("File too large").with_error(e.body_text());
    }
    tracing::error!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data").with_error(e.body_text())
}

/// Read the `file` and `description` parts of an upload.
async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, ApiError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = match field.content_type() {
                    Some(content_type) => content_type.to_string(),
                    None => mime_guess::from_path(&original_name)
                        .first_or_octet_stream()
                        .to_string(),
                };
                let content = field.bytes().await.map_err(multipart_error)?.to_vec();

                request.file = Some(UploadedFile::new(original_name, mime_type, content));
            }
            "description" => {
                request.description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(request)
}

/// POST /api/folders/:folderId/files - Upload a file.
///
/// Request body: multipart/form-data with "file" and optional "description" fields.
#[utoipa::path(
    post,
    path = "/api/folders/{folderId}/files",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    request_body(content_type = "multipart/form-data", description = "`file` part and optional `description`"),
    responses(
        (status = 201, description = "File uploaded", body = FileMessageResponse),
        (status = 400, description = "No file or file type does not match folder type", body = ErrorBody),
        (status = 404, description = "Folder not found", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<FileMessageResponse>), ApiError> {
    let multipart = multipart.map_err(|e| {
        ApiError::bad_request("Invalid multipart data").with_error(e.body_text())
    })?;
    let request = read_upload(multipart).await?;

    let file = state.files.upload_file(&folder_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(FileMessageResponse {
            message: "File uploaded successfully.".to_string(),
            file: file.into(),
        }),
    ))
}

/// PUT /api/folders/:folderId/files/:fileId - Update a file's description.
#[utoipa::path(
    put,
    path = "/api/folders/{folderId}/files/{fileId}",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID"),
        ("fileId" = String, Path, description = "File ID")
    ),
    request_body = UpdateDescriptionBody,
    responses(
        (status = 200, description = "Description updated", body = FileMessageResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn update_file_description(
    State(state): State<Arc<AppState>>,
    Path((folder_id, file_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<UpdateDescriptionBody>,
) -> Result<Json<FileMessageResponse>, ApiError> {
    let file = state
        .files
        .update_file_description(&folder_id, &file_id, body.description.as_deref())
        .await?;

    Ok(Json(FileMessageResponse {
        message: "File description updated successfully".to_string(),
        file: file.into(),
    }))
}

/// DELETE /api/folders/:folderId/files/:fileId - Delete a file.
#[utoipa::path(
    delete,
    path = "/api/folders/{folderId}/files/{fileId}",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID"),
        ("fileId" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((folder_id, file_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.files.delete_file(&folder_id, &file_id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

/// GET /api/folders/:folderId/files - List files in a folder.
#[utoipa::path(
    get,
    path = "/api/folders/{folderId}/files",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Files in upload order", body = Vec<FileResponse>),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn list_files_in_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = state.files.list_files_in_folder(&folder_id).await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/folders/:folderId/filesBySort?sort= - List files sorted by size or upload time.
#[utoipa::path(
    get,
    path = "/api/folders/{folderId}/filesBySort",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID"),
        SortQuery
    ),
    responses(
        (status = 200, description = "Files in ascending order", body = Vec<FileResponse>),
        (status = 400, description = "Invalid sort parameter", body = ErrorBody),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn sort_files(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let sort = query.sort.unwrap_or_default();
    let files = state.files.sort_files(&folder_id, &sort).await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/files?type= - List files whose mime type contains a substring.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(TypeQuery),
    responses(
        (status = 200, description = "Matching files across all folders", body = Vec<FileResponse>),
        (status = 400, description = "Missing type parameter", body = ErrorBody)
    )
)]
pub async fn get_files_by_type(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TypeQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let fragment = query.file_type.unwrap_or_default();
    let files = state.files.get_files_by_type(&fragment).await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/folders/:folderId/files/metadata - Id, name, size and description of each file.
#[utoipa::path(
    get,
    path = "/api/folders/{folderId}/files/metadata",
    tag = "files",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = Vec<FileMetadataResponse>),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn get_file_metadata(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<FileMetadataResponse>>, ApiError> {
    let metadata = state.files.get_file_metadata(&folder_id).await?;
    Ok(Json(
        metadata.into_iter().map(FileMetadataResponse::from).collect(),
    ))
}
