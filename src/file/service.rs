//! File service for FileForge.
//!
//! This module provides high-level file operations including:
//! - Upload with folder-type and size checks
//! - Description updates and deletion scoped to a folder
//! - Listing, sorting and type filtering

use std::sync::Arc;

use crate::{ForgeError, Result};

use super::folder::{Folder, FolderRepository};
use super::metadata::{FileRecord, FileRepository, FileSummary, NewFile, SortKey};
use super::storage::{BlobStore, UploadStaging};
use super::DEFAULT_MAX_FILE_SIZE;

/// File payload of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as sent by the client.
    pub original_name: String,
    /// Mime type as sent by the client.
    pub mime_type: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create a new uploaded file.
    pub fn new(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }
}

/// Request data for file upload.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// File payload. `None` when the client sent no file part.
    pub file: Option<UploadedFile>,
    /// File description (optional).
    pub description: Option<String>,
}

impl UploadRequest {
    /// Create a new upload request carrying a file.
    pub fn new(file: UploadedFile) -> Self {
        Self {
            file: Some(file),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// File service for managing uploads and file metadata.
#[derive(Clone)]
pub struct FileService {
    folders: FolderRepository,
    files: FileRepository,
    blobs: Arc<dyn BlobStore>,
    staging: UploadStaging,
    max_file_size: u64,
}

impl FileService {
    /// Create a new FileService.
    pub fn new(
        folders: FolderRepository,
        files: FileRepository,
        blobs: Arc<dyn BlobStore>,
        staging: UploadStaging,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            staging,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a new FileService with a custom max file size.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Upload a file into a folder.
    ///
    /// The payload is staged on disk, written to the blob store and only then
    /// recorded. If recording fails the blob is left behind.
    ///
    /// # Errors
    /// - `NotFound` if the folder does not exist
    /// - `Validation` if no file was sent or its mime type does not match the folder type
    /// - `PayloadTooLarge` if the file exceeds the configured size
    pub async fn upload_file(&self, folder_id: &str, request: UploadRequest) -> Result<FileRecord> {
        let folder = self.require_folder(folder_id).await?;

        let file = request
            .file
            .ok_or_else(|| ForgeError::Validation("No file uploaded.".to_string()))?;

        if !folder.folder_type.accepts(&file.mime_type) {
            return Err(ForgeError::Validation(
                "File type does not match folder type".to_string(),
            ));
        }

        if file.content.len() as u64 > self.max_file_size {
            let max_mb = self.max_file_size / 1024 / 1024;
            return Err(ForgeError::PayloadTooLarge(format!(
                "File too large (max {max_mb}MB)"
            )));
        }

        let staged = self.staging.stage(&file.original_name, &file.content).await?;
        let stored = self.blobs.put(staged.path()).await;
        staged.discard().await;
        let blob = stored?;

        let mut new_file = NewFile::new(
            &folder.folder_id,
            &file.original_name,
            &file.mime_type,
            file.content.len() as i64,
            &blob.url,
        );
        if let Some(description) = non_blank(request.description.as_deref()) {
            new_file = new_file.with_description(description);
        }

        let record = self.files.create(&new_file).await.map_err(|e| {
            tracing::warn!(url = %blob.url, error = %e, "File metadata not saved, blob orphaned");
            e
        })?;

        tracing::info!(
            file_id = %record.file_id,
            folder_id = %record.folder_id,
            size = record.size,
            backend = self.blobs.backend_name(),
            "File uploaded"
        );
        Ok(record)
    }

    /// Overwrite the description of a file in a folder.
    ///
    /// A blank description clears it, as on upload.
    pub async fn update_file_description(
        &self,
        folder_id: &str,
        file_id: &str,
        description: Option<&str>,
    ) -> Result<FileRecord> {
        let file = self.require_file(folder_id, file_id).await?;

        self.files
            .update_description(&file.file_id, non_blank(description))
            .await?
            .ok_or_else(file_not_found)
    }

    /// Delete a file from a folder. The blob is not removed.
    pub async fn delete_file(&self, folder_id: &str, file_id: &str) -> Result<()> {
        let file = self.require_file(folder_id, file_id).await?;

        if !self.files.delete(&file.file_id).await? {
            return Err(file_not_found());
        }

        tracing::info!(file_id = %file.file_id, folder_id = %folder_id, "File deleted");
        Ok(())
    }

    /// List files in a folder in upload order.
    pub async fn list_files_in_folder(&self, folder_id: &str) -> Result<Vec<FileRecord>> {
        let folder = self.require_folder(folder_id).await?;
        self.files.list_by_folder(&folder.folder_id).await
    }

    /// List files in a folder ascending by `sort` (`size` or `uploadedAt`).
    pub async fn sort_files(&self, folder_id: &str, sort: &str) -> Result<Vec<FileRecord>> {
        let key: SortKey = sort.parse()?;
        let folder = self.require_folder(folder_id).await?;
        tracing::debug!(folder_id = %folder.folder_id, sort = %key, "Listing sorted files");
        self.files.list_sorted(&folder.folder_id, key).await
    }

    /// List files across all folders whose mime type contains `fragment`.
    pub async fn get_files_by_type(&self, fragment: &str) -> Result<Vec<FileRecord>> {
        if fragment.trim().is_empty() {
            return Err(ForgeError::Validation(
                "Query parameter 'type' is required.".to_string(),
            ));
        }
        self.files.list_by_type(fragment).await
    }

    /// Get the id/name/size/description projection of a folder's files.
    pub async fn get_file_metadata(&self, folder_id: &str) -> Result<Vec<FileSummary>> {
        let folder = self.require_folder(folder_id).await?;
        self.files.list_summaries(&folder.folder_id).await
    }

    async fn require_folder(&self, folder_id: &str) -> Result<Folder> {
        self.folders
            .get_by_id(folder_id)
            .await?
            .ok_or_else(|| ForgeError::NotFound("Folder".to_string()))
    }

    async fn require_file(&self, folder_id: &str, file_id: &str) -> Result<FileRecord> {
        self.files
            .get_in_folder(folder_id, file_id)
            .await?
            .ok_or_else(file_not_found)
    }
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("backend", &self.blobs.backend_name())
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

fn file_not_found() -> ForgeError {
    ForgeError::NotFound("File".to_string())
}

fn non_blank(description: Option<&str>) -> Option<&str> {
    description.filter(|d| !d.trim().is_empty())
}
