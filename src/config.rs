//! Configuration module for FileForge.

use serde::Deserialize;
use std::path::Path;

use crate::{ForgeError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/fileforge.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory where uploads are staged before the blob store reads them.
    #[serde(default = "default_staging_path")]
    pub staging_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_staging_path() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl FilesConfig {
    /// Maximum upload size in bytes, or `None` if it does not fit in a `u64`.
    pub fn max_upload_bytes(&self) -> Option<u64> {
        self.max_upload_size_mb.checked_mul(1024 * 1024)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            staging_path: default_staging_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Blob store backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// Local directory served under `public_base_url`.
    #[default]
    Local,
    /// Cloudinary upload API.
    Cloudinary,
}

/// Cloudinary credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    /// Cloud name (account identifier).
    #[serde(default)]
    pub cloud_name: String,
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret used to sign uploads.
    #[serde(default)]
    pub api_secret: String,
    /// API base URL.
    #[serde(default = "default_cloudinary_api_base")]
    pub api_base: String,
}

fn default_cloudinary_api_base() -> String {
    "https://api.cloudinary.com".to_string()
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base: default_cloudinary_api_base(),
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobStoreConfig {
    /// Which backend to use.
    #[serde(default)]
    pub backend: BlobBackend,
    /// Container (namespace) all blobs are written under.
    #[serde(default = "default_container")]
    pub container: String,
    /// Root directory for the local backend.
    #[serde(default = "default_local_path")]
    pub local_path: String,
    /// Public URL prefix for blobs written by the local backend.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Cloudinary settings (used when `backend = "cloudinary"`).
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

fn default_container() -> String {
    "document_management_(FileForge)".to_string()
}

fn default_local_path() -> String {
    "data/blobs".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:3000/blobs".to_string()
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            container: default_container(),
            local_path: default_local_path(),
            public_base_url: default_public_base_url(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebConfig {
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/fileforge.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Blob store configuration.
    #[serde(default)]
    pub blob_store: BlobStoreConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ForgeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ForgeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEFORGE_PORT`: Override the listen port
    /// - `FILEFORGE_CLOUDINARY_API_SECRET`: Override the Cloudinary API secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("FILEFORGE_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid FILEFORGE_PORT value: {}", port),
            }
        }

        if let Ok(secret) = std::env::var("FILEFORGE_CLOUDINARY_API_SECRET") {
            if !secret.is_empty() {
                self.blob_store.cloudinary.api_secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The upload limit is zero
    /// - The container name is empty
    /// - The Cloudinary backend is selected without full credentials
    pub fn validate(&self) -> Result<()> {
        if self.files.max_upload_size_mb == 0 {
            return Err(ForgeError::Config(
                "files.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }

        if self.files.max_upload_bytes().is_none() {
            return Err(ForgeError::Config(format!(
                "files.max_upload_size_mb is too large: {}",
                self.files.max_upload_size_mb
            )));
        }

        if self.blob_store.container.trim().is_empty() {
            return Err(ForgeError::Config(
                "blob_store.container must not be empty".to_string(),
            ));
        }

        if self.blob_store.backend == BlobBackend::Cloudinary {
            let c = &self.blob_store.cloudinary;
            if c.cloud_name.is_empty() || c.api_key.is_empty() || c.api_secret.is_empty() {
                return Err(ForgeError::Config(
                    "Cloudinary backend selected but cloud_name, api_key or api_secret is not set. \
                     Set them in config.toml or via FILEFORGE_CLOUDINARY_API_SECRET."
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}
