//! Upload endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart body of `POST /upload` (documentation only; the handler reads
/// the parts directly).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadRequest {
    /// The photo. Must carry a filename.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Slug of the event the photo belongs to.
    #[serde(rename = "eventSlug")]
    #[schema(example = "summer-fair")]
    pub event_slug: String,
}

/// Response body for a successful `POST /upload`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Id of the created photo document.
    #[serde(rename = "docId")]
    pub doc_id: String,
}
