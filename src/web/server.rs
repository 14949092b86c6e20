//! Web server for FileForge.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use url::Url;

use crate::config::{BlobBackend, BlobStoreConfig, Config};
use crate::file::{
    BlobStore, CloudinaryBlobStore, FileRepository, FileService, FolderRepository, FolderService,
    LocalBlobStore, UploadStaging,
};
use crate::{Database, ForgeError, Result};

use super::handlers::AppState;
use super::router::{create_blob_router, create_health_router, create_router, create_swagger_router};

/// Build the blob store selected by configuration.
pub fn build_blob_store(config: &BlobStoreConfig) -> Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.backend {
        BlobBackend::Local => Arc::new(LocalBlobStore::new(
            &config.local_path,
            &config.container,
            &config.public_base_url,
        )?),
        BlobBackend::Cloudinary => Arc::new(CloudinaryBlobStore::new(
            config.cloudinary.clone(),
            &config.container,
        )?),
    };

    tracing::info!(
        backend = store.backend_name(),
        container = %config.container,
        "Blob store initialized"
    );
    Ok(store)
}

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
    /// Per-file upload limit in bytes.
    max_upload_bytes: usize,
    /// Mount path and root directory of locally stored blobs.
    local_blobs: Option<(String, PathBuf)>,
}

impl WebServer {
    /// Create a new web server, wiring repositories, services and the blob store.
    pub fn new(config: &Config, db: &Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse::<SocketAddr>()
            .map_err(|e| ForgeError::Config(format!("invalid server address: {e}")))?;

        let blobs = build_blob_store(&config.blob_store)?;
        let staging = UploadStaging::new(&config.files.staging_path)?;
        let max_upload_bytes = config.files.max_upload_bytes().ok_or_else(|| {
            ForgeError::Config("files.max_upload_size_mb is too large".to_string())
        })?;

        let folders = FolderRepository::new(db.pool().clone());
        let files = FileRepository::new(db.pool().clone());

        let app_state = AppState::new(
            FolderService::new(folders.clone(), files.clone()),
            FileService::new(folders, files, blobs, staging).with_max_file_size(max_upload_bytes),
        );

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.web.cors_origins.clone(),
            max_upload_bytes: usize::try_from(max_upload_bytes).unwrap_or(usize::MAX),
            local_blobs: local_blob_mount(&config.blob_store),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the complete router.
    pub fn router(&self) -> Router {
        let mut router = create_router(
            self.app_state.clone(),
            &self.cors_origins,
            self.max_upload_bytes,
        )
        .merge(create_health_router())
        .merge(create_swagger_router());

        if let Some((mount_path, root)) = &self.local_blobs {
            router = router.merge(create_blob_router(mount_path, root));
        }

        router
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Where to serve local blobs, derived from the public base URL's path.
fn local_blob_mount(config: &BlobStoreConfig) -> Option<(String, PathBuf)> {
    if config.backend != BlobBackend::Local {
        return None;
    }

    let url = Url::parse(&config.public_base_url).ok()?;
    let mount_path = url.path().trim_end_matches('/');
    if mount_path.is_empty() {
        tracing::warn!("public_base_url has no path; local blobs will not be served");
        return None;
    }

    Some((mount_path.to_string(), PathBuf::from(&config.local_path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.files.staging_path = dir.path().join("uploads").to_string_lossy().into_owned();
        config.blob_store.local_path = dir.path().join("blobs").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, &db).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert_eq!(
            server.local_blobs.as_ref().map(|(mount, _)| mount.as_str()),
            Some("/blobs")
        );
    }

    #[tokio::test]
    async fn test_web_server_rejects_bad_address() {
        let dir = TempDir::new().unwrap();
        let mut config = create_test_config(&dir);
        config.server.host = "not an address".to_string();
        let db = Database::open_in_memory().await.unwrap();

        assert!(matches!(
            WebServer::new(&config, &db),
            Err(ForgeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_rejects_overflowing_upload_limit() {
        let dir = TempDir::new().unwrap();
        let mut config = create_test_config(&dir);
        config.files.max_upload_size_mb = u64::MAX;
        let db = Database::open_in_memory().await.unwrap();

        assert!(matches!(
            WebServer::new(&config, &db),
            Err(ForgeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, &db).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }

    #[test]
    fn test_local_blob_mount() {
        let mut config = BlobStoreConfig::default();
        config.public_base_url = "http://cdn.example.com/static/blobs/".to_string();
        let (mount, _) = local_blob_mount(&config).unwrap();
        assert_eq!(mount, "/static/blobs");

        config.public_base_url = "http://cdn.example.com".to_string();
        assert!(local_blob_mount(&config).is_none());

        config.backend = BlobBackend::Cloudinary;
        assert!(local_blob_mount(&config).is_none());
    }
}
