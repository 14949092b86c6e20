//! Folder types and repository for FileForge.

use std::fmt;
use std::str::FromStr;

use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::{ForgeError, Result};

/// The mime-type family a folder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderType {
    Csv,
    Img,
    Pdf,
    Ppt,
}

impl FolderType {
    /// All folder types, in declaration order.
    pub const ALL: [FolderType; 4] = [
        FolderType::Csv,
        FolderType::Img,
        FolderType::Pdf,
        FolderType::Ppt,
    ];

    /// Convert to the database / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderType::Csv => "csv",
            FolderType::Img => "img",
            FolderType::Pdf => "pdf",
            FolderType::Ppt => "ppt",
        }
    }

    /// Check whether a mime type belongs to this folder type.
    ///
    /// The check is a case-sensitive substring match of the type name
    /// within the mime type (`application/pdf` matches `pdf`).
    pub fn accepts(&self, mime_type: &str) -> bool {
        mime_type.contains(self.as_str())
    }
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(FolderType::Csv),
            "img" => Ok(FolderType::Img),
            "pdf" => Ok(FolderType::Pdf),
            "ppt" => Ok(FolderType::Ppt),
            _ => Err(ForgeError::Validation(format!(
                "unknown folder type '{s}', expected one of csv, img, pdf, ppt"
            ))),
        }
    }
}

impl TryFrom<String> for FolderType {
    type Error = ForgeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A typed folder.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID (UUID).
    pub folder_id: String,
    /// Folder name, unique across all folders.
    pub name: String,
    /// Accepted mime-type family. Immutable after creation.
    #[sqlx(rename = "type", try_from = "String")]
    pub folder_type: FolderType,
    /// Advisory capacity.
    pub max_file_limit: i64,
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Accepted mime-type family.
    pub folder_type: FolderType,
    /// Advisory capacity.
    pub max_file_limit: i64,
}

impl NewFolder {
    /// Create a new NewFolder.
    pub fn new(name: impl Into<String>, folder_type: FolderType, max_file_limit: i64) -> Self {
        Self {
            name: name.into(),
            folder_type,
            max_file_limit,
        }
    }
}

/// Partial update for a folder. The type is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    /// New folder name.
    pub name: Option<String>,
    /// New advisory capacity.
    pub max_file_limit: Option<i64>,
}

impl FolderUpdate {
    /// Create a new FolderUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the max file limit.
    pub fn max_file_limit(mut self, limit: i64) -> Self {
        self.max_file_limit = Some(limit);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.max_file_limit.is_none()
    }
}

/// Map a unique constraint violation on `folders.name` to a conflict.
fn map_write_error(e: sqlx::Error) -> ForgeError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return ForgeError::Conflict("Folder name must be unique.".to_string());
        }
    }
    ForgeError::Database(e.to_string())
}

/// Repository for folder rows.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new FolderRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new folder with a fresh UUID.
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder> {
        let folder_id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO folders (folder_id, name, type, max_file_limit) VALUES (?, ?, ?, ?)",
        )
        .bind(&folder_id)
        .bind(&folder.name)
        .bind(folder.folder_type.as_str())
        .bind(folder.max_file_limit)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(&folder_id)
            .await?
            .ok_or_else(|| ForgeError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    pub async fn get_by_id(&self, folder_id: &str) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT folder_id, name, type, max_file_limit FROM folders WHERE folder_id = ?",
        )
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(folder)
    }

    /// Get a folder by its (unique) name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT folder_id, name, type, max_file_limit FROM folders WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(folder)
    }

    /// List all folders ordered by name.
    pub async fn list(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT folder_id, name, type, max_file_limit FROM folders ORDER BY name, folder_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }

    /// Update a folder. Returns `None` if the folder does not exist.
    pub async fn update(&self, folder_id: &str, update: &FolderUpdate) -> Result<Option<Folder>> {
        if update.is_empty() {
            return self.get_by_id(folder_id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE folders SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }

        if let Some(max_file_limit) = update.max_file_limit {
            separated.push("max_file_limit = ");
            separated.push_bind_unseparated(max_file_limit);
        }

        query.push(" WHERE folder_id = ");
        query.push_bind(folder_id);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(folder_id).await
    }

    /// Delete a folder by ID. Its files are removed by the FK cascade.
    pub async fn delete(&self, folder_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
