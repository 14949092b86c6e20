//! API handlers for the FileForge HTTP API.

pub mod file;
pub mod folder;

pub use file::*;
pub use folder::*;

use crate::file::{FileService, FolderService};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Folder operations.
    pub folders: FolderService,
    /// File operations.
    pub files: FileService,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(folders: FolderService, files: FileService) -> Self {
        Self { folders, files }
    }
}
