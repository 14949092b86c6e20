//! File metadata types and repository for FileForge.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{ForgeError, Result};

/// Metadata for an uploaded file. The bytes live in the blob store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID (UUID).
    pub file_id: String,
    /// Owning folder ID.
    pub folder_id: String,
    /// Original filename.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Mime type as reported by the uploader.
    #[sqlx(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Blob store URL.
    pub url: String,
    /// Upload timestamp, immutable.
    pub uploaded_at: DateTime<Utc>,
}

/// Projection of a file exposing only id, name, size and description.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileSummary {
    pub file_id: String,
    pub name: String,
    pub size: i64,
    pub description: Option<String>,
}

/// Data for creating a new file entry.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Owning folder ID.
    pub folder_id: String,
    /// Original filename.
    pub name: String,
    /// Mime type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Blob store URL.
    pub url: String,
    /// Description.
    pub description: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

impl NewFile {
    /// Create a new NewFile stamped with the current time.
    pub fn new(
        folder_id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: i64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            folder_id: folder_id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            url: url.into(),
            description: None,
            uploaded_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the upload timestamp.
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }
}

/// Sort key accepted by the sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Size,
    UploadedAt,
}

impl SortKey {
    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Size => "size",
            SortKey::UploadedAt => "uploadedAt",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SortKey::Size => "size",
            SortKey::UploadedAt => "uploaded_at",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "size" => Ok(SortKey::Size),
            "uploadedAt" => Ok(SortKey::UploadedAt),
            _ => Err(ForgeError::Validation(
                "Invalid sort parameter. Use 'size' or 'uploadedAt'.".to_string(),
            )),
        }
    }
}

const FILE_COLUMNS: &str =
    "file_id, folder_id, name, description, type, size, url, uploaded_at";

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new FileRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file entry with a fresh UUID.
    pub async fn create(&self, file: &NewFile) -> Result<FileRecord> {
        let file_id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO files (file_id, folder_id, name, description, type, size, url, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&file_id)
        .bind(&file.folder_id)
        .bind(&file.name)
        .bind(&file.description)
        .bind(&file.mime_type)
        .bind(file.size)
        .bind(&file.url)
        .bind(file.uploaded_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&file_id)
            .await?
            .ok_or_else(|| ForgeError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, file_id: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE file_id = ?"
        ))
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    /// Get a file only if it belongs to the given folder.
    pub async fn get_in_folder(&self, folder_id: &str, file_id: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE file_id = ? AND folder_id = ?"
        ))
        .bind(file_id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    /// List files in a folder in insertion order.
    pub async fn list_by_folder(&self, folder_id: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = ? ORDER BY rowid"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// List files in a folder ascending by the given key, ties in insertion order.
    pub async fn list_sorted(&self, folder_id: &str, key: SortKey) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = ? ORDER BY {} ASC, rowid ASC",
            key.column()
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// List files across all folders whose mime type contains `fragment`.
    ///
    /// `instr` keeps the match case-sensitive, unlike `LIKE`.
    pub async fn list_by_type(&self, fragment: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE instr(type, ?) > 0 ORDER BY rowid"
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// List the id/name/size/description projection for a folder.
    pub async fn list_summaries(&self, folder_id: &str) -> Result<Vec<FileSummary>> {
        let summaries = sqlx::query_as::<_, FileSummary>(
            "SELECT file_id, name, size, description FROM files WHERE folder_id = ? ORDER BY rowid",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Overwrite the description of a file. Returns `None` if the file is gone.
    pub async fn update_description(
        &self,
        file_id: &str,
        description: Option<&str>,
    ) -> Result<Option<FileRecord>> {
        let result = sqlx::query("UPDATE files SET description = ? WHERE file_id = ?")
            .bind(description)
            .bind(file_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(file_id).await
    }

    /// Delete a file by ID.
    pub async fn delete(&self, file_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE file_id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FolderRepository, FolderType, NewFolder};
    use crate::Database;
    use chrono::Duration;

    async fn setup() -> (Database, FileRepository, String) {
        let db = Database::open_in_memory().await.unwrap();
        let folder = FolderRepository::new(db.pool().clone())
            .create(&NewFolder::new("Docs", FolderType::Pdf, 10))
            .await
            .unwrap();
        let repo = FileRepository::new(db.pool().clone());
        (db, repo, folder.folder_id)
    }

    fn pdf(folder_id: &str, name: &str, size: i64) -> NewFile {
        NewFile::new(
            folder_id,
            name,
            "application/pdf",
            size,
            format!("http://blobs/{name}"),
        )
    }

    #[tokio::test]
    async fn test_create_file() {
        let (_db, repo, folder_id) = setup().await;

        let file = repo
            .create(&pdf(&folder_id, "a.pdf", 42).with_description("first"))
            .await
            .unwrap();

        assert_eq!(file.folder_id, folder_id);
        assert_eq!(file.name, "a.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size, 42);
        assert_eq!(file.url, "http://blobs/a.pdf");
        assert_eq!(file.description, Some("first".to_string()));
    }

    #[tokio::test]
    async fn test_create_file_unknown_folder_fails() {
        let (_db, repo, _folder_id) = setup().await;
        let result = repo.create(&pdf("no-such-folder", "a.pdf", 1)).await;
        assert!(matches!(result, Err(ForgeError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_in_folder_requires_both_ids() {
        let (db, repo, folder_id) = setup().await;
        let other = FolderRepository::new(db.pool().clone())
            .create(&NewFolder::new("Other", FolderType::Pdf, 1))
            .await
            .unwrap();
        let file = repo.create(&pdf(&folder_id, "a.pdf", 1)).await.unwrap();

        assert!(repo
            .get_in_folder(&folder_id, &file.file_id)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .get_in_folder(&other.folder_id, &file.file_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_by_folder_insertion_order() {
        let (_db, repo, folder_id) = setup().await;
        repo.create(&pdf(&folder_id, "1.pdf", 30)).await.unwrap();
        repo.create(&pdf(&folder_id, "2.pdf", 10)).await.unwrap();
        repo.create(&pdf(&folder_id, "3.pdf", 20)).await.unwrap();

        let names: Vec<_> = repo
            .list_by_folder(&folder_id)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["1.pdf", "2.pdf", "3.pdf"]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_size() {
        let (_db, repo, folder_id) = setup().await;
        repo.create(&pdf(&folder_id, "big.pdf", 300)).await.unwrap();
        repo.create(&pdf(&folder_id, "small.pdf", 5)).await.unwrap();
        repo.create(&pdf(&folder_id, "mid.pdf", 40)).await.unwrap();

        let sizes: Vec<_> = repo
            .list_sorted(&folder_id, SortKey::Size)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.size)
            .collect();
        assert_eq!(sizes, vec![5, 40, 300]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_uploaded_at() {
        let (_db, repo, folder_id) = setup().await;
        let now = Utc::now();
        repo.create(&pdf(&folder_id, "newest.pdf", 1).with_uploaded_at(now))
            .await
            .unwrap();
        repo.create(&pdf(&folder_id, "oldest.pdf", 1).with_uploaded_at(now - Duration::hours(2)))
            .await
            .unwrap();
        repo.create(&pdf(&folder_id, "middle.pdf", 1).with_uploaded_at(now - Duration::hours(1)))
            .await
            .unwrap();

        let files = repo
            .list_sorted(&folder_id, SortKey::UploadedAt)
            .await
            .unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["oldest.pdf", "middle.pdf", "newest.pdf"]);
        assert!(files.windows(2).all(|w| w[0].uploaded_at <= w[1].uploaded_at));
    }

    #[tokio::test]
    async fn test_list_by_type_is_case_sensitive_substring() {
        let (db, repo, folder_id) = setup().await;
        let csv_folder = FolderRepository::new(db.pool().clone())
            .create(&NewFolder::new("Sheets", FolderType::Csv, 10))
            .await
            .unwrap();
        repo.create(&pdf(&folder_id, "a.pdf", 1)).await.unwrap();
        repo.create(&NewFile::new(
            &csv_folder.folder_id,
            "b.csv",
            "text/csv",
            2,
            "http://blobs/b.csv",
        ))
        .await
        .unwrap();
        repo.create(&NewFile::new(
            &csv_folder.folder_id,
            "c.csv",
            "text/CSV",
            3,
            "http://blobs/c.csv",
        ))
        .await
        .unwrap();

        let csv = repo.list_by_type("csv").await.unwrap();
        assert_eq!(csv.len(), 1);
        assert_eq!(csv[0].name, "b.csv");

        let text = repo.list_by_type("text/").await.unwrap();
        assert_eq!(text.len(), 2);
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let (_db, repo, folder_id) = setup().await;
        let file = repo
            .create(&pdf(&folder_id, "a.pdf", 7).with_description("d"))
            .await
            .unwrap();

        let summaries = repo.list_summaries(&folder_id).await.unwrap();
        assert_eq!(
            summaries,
            vec![FileSummary {
                file_id: file.file_id,
                name: "a.pdf".to_string(),
                size: 7,
                description: Some("d".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_update_description() {
        let (_db, repo, folder_id) = setup().await;
        let file = repo.create(&pdf(&folder_id, "a.pdf", 1)).await.unwrap();

        let updated = repo
            .update_description(&file.file_id, Some("new text"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, Some("new text".to_string()));
        assert_eq!(updated.uploaded_at, file.uploaded_at);

        let cleared = repo
            .update_description(&file.file_id, None)
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.description.is_none());

        assert!(repo
            .update_description("missing", Some("x"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (_db, repo, folder_id) = setup().await;
        let file = repo.create(&pdf(&folder_id, "a.pdf", 1)).await.unwrap();

        assert!(repo.delete(&file.file_id).await.unwrap());
        assert!(repo.get_by_id(&file.file_id).await.unwrap().is_none());
        assert!(!repo.delete(&file.file_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_folder_delete_cascades() {
        let (db, repo, folder_id) = setup().await;
        let file = repo.create(&pdf(&folder_id, "a.pdf", 1)).await.unwrap();

        FolderRepository::new(db.pool().clone())
            .delete(&folder_id)
            .await
            .unwrap();

        assert!(repo.get_by_id(&file.file_id).await.unwrap().is_none());
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("size".parse::<SortKey>().unwrap(), SortKey::Size);
        assert_eq!("uploadedAt".parse::<SortKey>().unwrap(), SortKey::UploadedAt);
        assert!(matches!(
            "name".parse::<SortKey>(),
            Err(ForgeError::Validation(_))
        ));
        assert!("uploaded_at".parse::<SortKey>().is_err());
    }
}
