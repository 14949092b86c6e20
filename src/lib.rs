//! FileForge - typed-folder document management backend.
//!
//! Files are organized into folders that each accept one mime-type family
//! (csv, img, pdf, ppt). Metadata lives in SQLite; file bytes go to a blob
//! store (local directory or Cloudinary).

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{ForgeError, Result};
pub use file::{
    FileRecord, FileService, Folder, FolderService, FolderType, FolderWithFiles, SortKey,
};
