//! Blob storage for FileForge.
//!
//! Uploaded bytes are staged on local disk, then handed to a [`BlobStore`]
//! by path. The store copies them somewhere durable and returns a URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use url::Url;
use uuid::Uuid;

use crate::{ForgeError, Result};

/// Reference to a blob written by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Durable URL of the blob.
    pub url: String,
}

/// External object storage that accepts a local file and returns its URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the file at `local_path` under this store's container.
    async fn put(&self, local_path: &Path) -> Result<BlobRef>;

    /// Name of the backend, for logging.
    fn backend_name(&self) -> &'static str;
}

/// Local directory blob store.
///
/// Blobs are stored in a sharded layout under the container:
/// ```text
/// {base_path}/{container}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.pdf
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    container: String,
    public_base_url: Url,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore.
    ///
    /// The container directory is created if it doesn't exist.
    pub fn new(
        base_path: impl Into<PathBuf>,
        container: impl Into<String>,
        public_base_url: &str,
    ) -> Result<Self> {
        let base_path = base_path.into();
        let container = container.into();

        let public_base_url = Url::parse(public_base_url)
            .map_err(|e| ForgeError::Config(format!("invalid public_base_url: {e}")))?;
        if public_base_url.cannot_be_a_base() {
            return Err(ForgeError::Config(format!(
                "public_base_url cannot be used as a base: {public_base_url}"
            )));
        }

        std::fs::create_dir_all(base_path.join(&container))?;

        Ok(Self {
            base_path,
            container,
            public_base_url,
        })
    }

    /// Get the container directory.
    pub fn container_path(&self) -> PathBuf {
        self.base_path.join(&self.container)
    }

    /// Resolve the on-disk path of a stored blob name.
    pub fn blob_path(&self, stored_name: &str) -> PathBuf {
        self.container_path()
            .join(Self::shard(stored_name))
            .join(stored_name)
    }

    /// Shard directory for a stored name (first 2 characters).
    fn shard(stored_name: &str) -> &str {
        stored_name.get(..2).unwrap_or("_")
    }

    /// Build the public URL for a stored blob name.
    fn url_for(&self, stored_name: &str) -> String {
        let mut url = self.public_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.container.as_str(), Self::shard(stored_name), stored_name]);
        }
        url.to_string()
    }

    /// Extract a sanitized file extension, defaulting to `bin`.
    fn extract_extension(path: &Path) -> String {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ext.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .take(10)
                    .collect::<String>()
                    .to_lowercase()
            })
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, local_path: &Path) -> Result<BlobRef> {
        let stored_name = format!("{}.{}", Uuid::new_v4(), Self::extract_extension(local_path));
        let target = self.blob_path(&stored_name);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::copy(local_path, &target).await.map_err(|e| {
            ForgeError::BlobStore(format!(
                "failed to copy {} into local store: {e}",
                local_path.display()
            ))
        })?;

        tracing::debug!(stored_name = %stored_name, "Blob written to local store");

        Ok(BlobRef {
            url: self.url_for(&stored_name),
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// A file written to the staging directory.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file. Failures are logged, not returned.
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

/// Local staging area for uploads waiting to be handed to the blob store.
#[derive(Debug, Clone)]
pub struct UploadStaging {
    dir: PathBuf,
}

impl UploadStaging {
    /// Create a new staging area, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write `content` to a new staged file named `{millis}-{tag}-{original_name}`.
    ///
    /// The original name is shortened, keeping its extension, so the staged
    /// name stays within [`MAX_FILE_NAME_BYTES`].
    pub async fn stage(&self, original_name: &str, content: &[u8]) -> Result<StagedFile> {
        let tag = Uuid::new_v4().simple().to_string();
        let prefix = format!("{}-{}-", Utc::now().timestamp_millis(), &tag[..8]);
        let name = truncate_filename(
            &sanitize_filename(original_name),
            MAX_FILE_NAME_BYTES - prefix.len(),
        );
        let path = self.dir.join(format!("{prefix}{name}"));

        fs::write(&path, content).await?;

        Ok(StagedFile { path })
    }
}

/// Reduce a client-supplied filename to a safe single path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Shorten `name` to at most `max_bytes`, cutting the stem on a char
/// boundary and keeping a short extension.
fn truncate_filename(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 && name.len() - idx <= max_bytes / 2 => name.split_at(idx),
        _ => (name, ""),
    };

    let mut end = max_bytes - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ext}", &stem[..end])
}
