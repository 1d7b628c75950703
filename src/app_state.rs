//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::CorsPolicy;
use crate::service::UploadService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upload service for all business logic.
    pub upload_service: Arc<UploadService>,
    /// Cross-origin policy enforced before handlers run.
    pub cors: Arc<CorsPolicy>,
    /// Request body limit for `/upload`.
    pub max_upload_bytes: usize,
}
