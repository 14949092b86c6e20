//! HTTP API for FileForge.
//!
//! Folder routes live under `/folders`, file routes under `/api`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router, create_swagger_router};
pub use server::{build_blob_store, WebServer};
