//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto;
use super::error::ErrorBody;
use super::handlers::{self, AppState};
use super::middleware::create_cors_layer;

/// Extra body allowance on the upload route for multipart framing and the description part.
pub const UPLOAD_BODY_SLACK: usize = 64 * 1024;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FileForge API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Typed-folder document management"
    ),
    tags(
        (name = "folders", description = "Folder management"),
        (name = "files", description = "File upload and queries")
    ),
    paths(
        handlers::create_folder,
        handlers::update_folder,
        handlers::delete_folder,
        handlers::get_folder,
        handlers::list_folders,
        handlers::upload_file,
        handlers::update_file_description,
        handlers::delete_file,
        handlers::list_files_in_folder,
        handlers::sort_files,
        handlers::get_files_by_type,
        handlers::get_file_metadata,
    ),
    components(schemas(
        dto::CreateFolderBody,
        dto::UpdateFolderBody,
        dto::UpdateDescriptionBody,
        dto::FolderResponse,
        dto::FolderDetailResponse,
        dto::FolderMessageResponse,
        dto::FileResponse,
        dto::FileMetadataResponse,
        dto::FileMessageResponse,
        dto::MessageResponse,
        ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Create the main API router.
///
/// `max_upload_bytes` bounds a single uploaded file; the upload route's body
/// limit adds [`UPLOAD_BODY_SLACK`] on top of it.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    let folder_routes = Router::new()
        .route("/folder/create", post(handlers::create_folder))
        .route("/folders", get(handlers::list_folders))
        .route(
            "/folders/:folderId",
            get(handlers::get_folder)
                .put(handlers::update_folder)
                .delete(handlers::delete_folder),
        );

    let upload_limit = DefaultBodyLimit::max(max_upload_bytes.saturating_add(UPLOAD_BODY_SLACK));

    let file_routes = Router::new()
        .route(
            "/folders/:folderId/files",
            post(handlers::upload_file)
                .layer(upload_limit)
                .get(handlers::list_files_in_folder),
        )
        .route(
            "/folders/:folderId/files/metadata",
            get(handlers::get_file_metadata),
        )
        .route(
            "/folders/:folderId/files/:fileId",
            put(handlers::update_file_description).delete(handlers::delete_file),
        )
        .route("/folders/:folderId/filesBySort", get(handlers::sort_files))
        .route("/files", get(handlers::get_files_by_type));

    Router::new()
        .nest("/folders", folder_routes)
        .nest("/api", file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router serving `/swagger-ui` and `/api-docs/openapi.json`.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Serve locally stored blobs under `mount_path`.
pub fn create_blob_router(mount_path: &str, blob_root: impl AsRef<Path>) -> Router {
    Router::new().nest_service(mount_path, ServeDir::new(blob_root.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/folders/folder/create",
            "/folders/folders",
            "/folders/folders/{folderId}",
            "/api/folders/{folderId}/files",
            "/api/folders/{folderId}/files/{fileId}",
            "/api/folders/{folderId}/files/metadata",
            "/api/folders/{folderId}/filesBySort",
            "/api/files",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }
}
