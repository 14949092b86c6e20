//! Folder service for FileForge.
//!
//! This module provides folder operations including:
//! - Creation with unique-name and limit checks
//! - Partial updates (name and limit only)
//! - Deletion with cascade to the folder's files
//! - Lookup with files eagerly loaded

use crate::{ForgeError, Result};

use super::folder::{Folder, FolderRepository, FolderUpdate, NewFolder};
use super::metadata::{FileRecord, FileRepository};

/// A folder together with its files.
#[derive(Debug, Clone)]
pub struct FolderWithFiles {
    /// The folder.
    pub folder: Folder,
    /// Files in insertion order.
    pub files: Vec<FileRecord>,
}

/// Service for managing folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: FolderRepository,
    files: FileRepository,
}

impl FolderService {
    /// Create a new FolderService.
    pub fn new(folders: FolderRepository, files: FileRepository) -> Self {
        Self { folders, files }
    }

    /// Create a folder.
    ///
    /// # Errors
    /// - `Validation` if the name is blank or the limit is not positive
    /// - `Conflict` if another folder already has the name
    pub async fn create_folder(&self, request: &NewFolder) -> Result<Folder> {
        validate_name(&request.name)?;
        validate_limit(request.max_file_limit)?;

        if self.folders.get_by_name(&request.name).await?.is_some() {
            return Err(name_conflict());
        }

        let folder = self.folders.create(request).await?;
        tracing::info!(
            folder_id = %folder.folder_id,
            name = %folder.name,
            folder_type = %folder.folder_type,
            "Folder created"
        );
        Ok(folder)
    }

    /// Update a folder's name and/or limit. Absent fields keep their values.
    pub async fn update_folder(&self, folder_id: &str, update: &FolderUpdate) -> Result<Folder> {
        let existing = self
            .folders
            .get_by_id(folder_id)
            .await?
            .ok_or_else(folder_not_found)?;

        if let Some(ref name) = update.name {
            validate_name(name)?;
            if let Some(other) = self.folders.get_by_name(name).await? {
                if other.folder_id != existing.folder_id {
                    return Err(name_conflict());
                }
            }
        }
        if let Some(limit) = update.max_file_limit {
            validate_limit(limit)?;
        }

        let folder = self
            .folders
            .update(folder_id, update)
            .await?
            .ok_or_else(folder_not_found)?;

        tracing::info!(folder_id = %folder.folder_id, "Folder updated");
        Ok(folder)
    }

    /// Delete a folder and, through the FK cascade, all of its files.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        if !self.folders.delete(folder_id).await? {
            return Err(folder_not_found());
        }

        tracing::info!(folder_id = %folder_id, "Folder deleted");
        Ok(())
    }

    /// Get a folder with its files.
    pub async fn get_folder(&self, folder_id: &str) -> Result<FolderWithFiles> {
        let folder = self
            .folders
            .get_by_id(folder_id)
            .await?
            .ok_or_else(folder_not_found)?;
        let files = self.files.list_by_folder(&folder.folder_id).await?;

        Ok(FolderWithFiles { folder, files })
    }

    /// List all folders.
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.folders.list().await
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ForgeError::Validation("Folder name must not be empty.".to_string()));
    }
    Ok(())
}

fn validate_limit(limit: i64) -> Result<()> {
    if limit <= 0 {
        return Err(ForgeError::Validation(
            "maxFileLimit must be a positive integer.".to_string(),
        ));
    }
    Ok(())
}

fn folder_not_found() -> ForgeError {
    ForgeError::NotFound("Folder".to_string())
}

fn name_conflict() -> ForgeError {
    ForgeError::Conflict("Folder name must be unique.".to_string())
}
