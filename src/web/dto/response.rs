//! Response DTOs for Web API.
//!
//! All bodies use camelCase field names.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{FileRecord, FileSummary, Folder, FolderWithFiles};

// ============================================================================
// Folders
// ============================================================================

/// Folder response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    /// Folder ID.
    pub folder_id: String,
    /// Folder name.
    pub name: String,
    /// Accepted type (`csv`, `img`, `pdf`, `ppt`).
    #[serde(rename = "type")]
    pub folder_type: String,
    /// Advisory capacity.
    pub max_file_limit: i64,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            folder_id: folder.folder_id,
            name: folder.name,
            folder_type: folder.folder_type.as_str().to_string(),
            max_file_limit: folder.max_file_limit,
        }
    }
}

/// Folder response with its files.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderDetailResponse {
    /// Folder ID.
    pub folder_id: String,
    /// Folder name.
    pub name: String,
    /// Accepted type.
    #[serde(rename = "type")]
    pub folder_type: String,
    /// Advisory capacity.
    pub max_file_limit: i64,
    /// Files in upload order.
    pub files: Vec<FileResponse>,
}

impl From<FolderWithFiles> for FolderDetailResponse {
    fn from(loaded: FolderWithFiles) -> Self {
        let FolderWithFiles { folder, files } = loaded;
        Self {
            folder_id: folder.folder_id,
            name: folder.name,
            folder_type: folder.folder_type.as_str().to_string(),
            max_file_limit: folder.max_file_limit,
            files: files.into_iter().map(FileResponse::from).collect(),
        }
    }
}

/// `{message, folder}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct FolderMessageResponse {
    /// Outcome message.
    pub message: String,
    /// The created or updated folder.
    pub folder: FolderResponse,
}

// ============================================================================
// Files
// ============================================================================

/// File response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub file_id: String,
    /// Owning folder ID.
    pub folder_id: String,
    /// Original filename.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Mime type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Blob URL.
    pub url: String,
    /// Upload time (RFC 3339).
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponse {
    fn from(file: FileRecord) -> Self {
        Self {
            file_id: file.file_id,
            folder_id: file.folder_id,
            name: file.name,
            description: file.description,
            mime_type: file.mime_type,
            size: file.size,
            url: file.url,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// File metadata projection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataResponse {
    /// File ID.
    pub file_id: String,
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// Description.
    pub description: Option<String>,
}

impl From<FileSummary> for FileMetadataResponse {
    fn from(summary: FileSummary) -> Self {
        Self {
            file_id: summary.file_id,
            name: summary.name,
            size: summary.size,
            description: summary.description,
        }
    }
}

/// `{message, file}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileMessageResponse {
    /// Outcome message.
    pub message: String,
    /// The uploaded or updated file.
    pub file: FileResponse,
}

// ============================================================================
// Common
// ============================================================================

/// `{message}` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Outcome message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
