//! Folder and file management for FileForge.
//!
//! This module provides:
//! - Typed folders (csv/img/pdf/ppt) and their repository
//! - File metadata and its repository
//! - Blob storage adapters and upload staging
//! - The folder and file services used by the web layer

mod cloudinary;
mod folder;
mod folder_service;
mod metadata;
mod service;
mod storage;

pub use cloudinary::CloudinaryBlobStore;
pub use folder::{Folder, FolderRepository, FolderType, FolderUpdate, NewFolder};
pub use folder_service::{FolderService, FolderWithFiles};
pub use metadata::{FileRecord, FileRepository, FileSummary, NewFile, SortKey};
pub use service::{FileService, UploadRequest, UploadedFile};
pub use storage::{sanitize_filename, BlobRef, BlobStore, LocalBlobStore, StagedFile, UploadStaging};

/// Default maximum file size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
