//! Test helpers for HTTP API tests.
//!
//! Provides a TestApp wrapping an axum-test TestServer over an in-memory
//! database and a temporary blob store, plus request helpers.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use tempfile::TempDir;

use fileforge::web::WebServer;
use fileforge::{Config, Database};

/// A running test application.
pub struct TestApp {
    /// HTTP test server.
    pub server: TestServer,
    /// Database behind the server.
    pub db: Database,
    /// Temporary directory holding staging and blob files.
    pub dir: TempDir,
}

/// Create a test configuration rooted in `dir`.
pub fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.files.staging_path = dir.path().join("uploads").to_string_lossy().into_owned();
    config.blob_store.local_path = dir.path().join("blobs").to_string_lossy().into_owned();
    config.blob_store.container = "forge".to_string();
    config
}

/// Create a test app with the default configuration.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(|_| {}).await
}

/// Create a test app after adjusting the configuration.
pub async fn create_test_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&dir);
    adjust(&mut config);

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let web = WebServer::new(&config, &db).expect("Failed to build web server");
    let server = TestServer::new(web.router()).expect("Failed to create test server");

    TestApp { server, db, dir }
}

/// Create a folder and return its JSON representation.
pub async fn create_folder(server: &TestServer, name: &str, folder_type: &str, limit: i64) -> Value {
    let response = server
        .post("/folders/folder/create")
        .json(&json!({
            "name": name,
            "type": folder_type,
            "maxFileLimit": limit
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["folder"].clone()
}

/// Get the folder ID from a folder JSON value.
pub fn folder_id(folder: &Value) -> String {
    folder["folderId"].as_str().expect("folderId").to_string()
}

/// Upload a file with the given mime type.
pub async fn upload(
    server: &TestServer,
    folder_id: &str,
    name: &str,
    mime_type: &str,
    content: Vec<u8>,
    description: Option<&str>,
) -> TestResponse {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(content).file_name(name).mime_type(mime_type),
    );
    if let Some(description) = description {
        form = form.add_text("description", description);
    }

    server
        .post(&format!("/api/folders/{folder_id}/files"))
        .multipart(form)
        .await
}

/// Upload a PDF of `size` bytes and return the file JSON.
pub async fn upload_pdf(server: &TestServer, folder_id: &str, name: &str, size: usize) -> Value {
    let response = upload(
        server,
        folder_id,
        name,
        "application/pdf",
        vec![b'%'; size],
        None,
    )
    .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["file"].clone()
}
