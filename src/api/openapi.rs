//! OpenAPI document and optional Swagger UI.

use utoipa::OpenApi;

use crate::api::dto::{UploadRequest, UploadResponse};
use crate::api::handlers::{system, upload};
use crate::error::ErrorResponse;

/// OpenAPI description of the gateway.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(upload::upload_photo, system::health_handler),
    components(schemas(UploadRequest, UploadResponse, ErrorResponse, system::HealthResponse)),
    tags(
        (name = "Upload", description = "Photo ingestion"),
        (name = "System", description = "Operational endpoints")
    ),
    info(
        title = "event-photo-gateway",
        description = "Uploads EXIF-dated photos to a content store and links them to events",
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, serving the document at
/// `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn swagger_router() -> axum::Router {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_upload_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/upload"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
