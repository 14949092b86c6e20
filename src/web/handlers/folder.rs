//! Folder handlers for Web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::file::{FolderUpdate, NewFolder};
use crate::web::dto::{
    CreateFolderBody, FolderDetailResponse, FolderMessageResponse, FolderResponse,
    MessageResponse, UpdateFolderBody, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// POST /folders/folder/create - Create a folder.
#[utoipa::path(
    post,
    path = "/folders/folder/create",
    tag = "folders",
    request_body = CreateFolderBody,
    responses(
        (status = 201, description = "Folder created", body = FolderMessageResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 409, description = "Folder name already exists", body = ErrorBody)
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateFolderBody>,
) -> Result<(StatusCode, Json<FolderMessageResponse>), ApiError> {
    let request = NewFolder::try_from(body)?;
    let folder = state.folders.create_folder(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(FolderMessageResponse {
            message: "Folder created successfully".to_string(),
            folder: folder.into(),
        }),
    ))
}

/// PUT /folders/folders/:folderId - Update a folder's name and/or limit.
#[utoipa::path(
    put,
    path = "/folders/folders/{folderId}",
    tag = "folders",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    request_body = UpdateFolderBody,
    responses(
        (status = 200, description = "Folder updated", body = FolderMessageResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 404, description = "Folder not found", body = ErrorBody),
        (status = 409, description = "Folder name already exists", body = ErrorBody)
    )
)]
pub async fn update_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateFolderBody>,
) -> Result<Json<FolderMessageResponse>, ApiError> {
    let update = FolderUpdate::try_from(body)?;
    let folder = state.folders.update_folder(&folder_id, &update).await?;

    Ok(Json(FolderMessageResponse {
        message: "Folder updated successfully.".to_string(),
        folder: folder.into(),
    }))
}

/// DELETE /folders/folders/:folderId - Delete a folder and its files.
#[utoipa::path(
    delete,
    path = "/folders/folders/{folderId}",
    tag = "folders",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder deleted", body = MessageResponse),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.folders.delete_folder(&folder_id).await?;
    Ok(Json(MessageResponse::new("Folder deleted successfully.")))
}

/// GET /folders/folders/:folderId - Get a folder with its files.
#[utoipa::path(
    get,
    path = "/folders/folders/{folderId}",
    tag = "folders",
    params(
        ("folderId" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder with files", body = FolderDetailResponse),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> Result<Json<FolderDetailResponse>, ApiError> {
    let loaded = state.folders.get_folder(&folder_id).await?;
    Ok(Json(loaded.into()))
}

/// GET /folders/folders - List all folders.
#[utoipa::path(
    get,
    path = "/folders/folders",
    tag = "folders",
    responses(
        (status = 200, description = "All folders", body = Vec<FolderResponse>)
    )
)]
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = state.folders.list_folders().await?;
    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}
