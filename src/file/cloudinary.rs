//! Cloudinary blob store adapter.
//!
//! Uploads go to `POST {api_base}/v1_1/{cloud_name}/auto/upload` as a signed
//! multipart request. Only `folder` and `timestamp` are signed.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::storage::{BlobRef, BlobStore};
use crate::config::CloudinaryConfig;
use crate::{ForgeError, Result};

/// Successful upload response (fields we use).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

/// Error response body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Blob store backed by Cloudinary.
#[derive(Debug, Clone)]
pub struct CloudinaryBlobStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    container: String,
}

impl CloudinaryBlobStore {
    /// Create a new store uploading into `container`.
    pub fn new(config: CloudinaryConfig, container: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fileforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ForgeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            container: container.into(),
        })
    }

    /// Upload endpoint for the configured cloud.
    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Sign the upload parameters.
    ///
    /// Parameters are sorted by key, joined as `k=v&k=v`, the API secret is
    /// appended and the result hashed with SHA-256 (hex encoded).
    pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
    }
}

#[async_trait]
impl BlobStore for CloudinaryBlobStore {
    async fn put(&self, local_path: &Path) -> Result<BlobRef> {
        let content = tokio::fs::read(local_path).await?;
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[("folder", self.container.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.container.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature)
            .part("file", Part::bytes(content).file_name(file_name));

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ForgeError::BlobStore(format!("upload request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            return Err(ForgeError::BlobStore(format!(
                "upload rejected ({status}): {message}"
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::BlobStore(format!("invalid upload response: {e}")))?;

        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| ForgeError::BlobStore("upload response has no url".to_string()))?;

        Ok(BlobRef { url })
    }

    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }
}
