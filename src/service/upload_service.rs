//! Upload service: turns a validated upload into an asset plus a photo
//! document.

use std::sync::Arc;

use crate::domain::capture_time::{now_millis, taken_at_or};
use crate::domain::{DocumentId, PhotoRecord, UploadedPhoto};
use crate::error::GatewayError;
use crate::store::ContentStore;

/// Content type sent for parts that did not declare an image type.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Orchestration layer for photo ingestion.
///
/// Every call follows the same strictly sequential pattern: extract the
/// capture time → resolve the event → upload the asset → create the
/// document. The event is resolved before any bytes are sent, so an
/// unknown slug never leaves an asset behind.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<dyn ContentStore>,
    cleanup_orphaned_assets: bool,
}

impl UploadService {
    /// Creates a new `UploadService`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, cleanup_orphaned_assets: bool) -> Self {
        Self {
            store,
            cleanup_orphaned_assets,
        }
    }

    /// Stores `photo` under the event identified by `event_slug`.
    ///
    /// Not idempotent: submitting the same photo twice creates two assets
    /// and two documents.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no event has the slug, or
    /// [`GatewayError::Store`] if any content-store call fails.
    pub async fn ingest(
        &self,
        photo: UploadedPhoto,
        event_slug: &str,
    ) -> Result<DocumentId, GatewayError> {
        let received_at = now_millis();
        let taken_at = taken_at_or(&photo.data, received_at);

        let event = self
            .store
            .find_event_by_slug(event_slug)
            .await?
            .ok_or_else(|| GatewayError::EventNotFound(event_slug.to_string()))?;

        let content_type = photo
            .content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        let asset = self
            .store
            .upload_image_asset(photo.data.clone(), &photo.filename, content_type)
            .await?;

        let record = PhotoRecord::new(photo.filename, &asset, &event, taken_at, now_millis());
        let doc_id = match self.store.create_document(&record).await {
            Ok(id) => id,
            Err(err) => {
                if self.cleanup_orphaned_assets {
                    if let Err(cleanup_err) = self.store.delete_asset(&asset).await {
                        tracing::warn!(asset_id = %asset, error = %cleanup_err, "orphaned asset cleanup failed");
                    } else {
                        tracing::info!(asset_id = %asset, "orphaned asset removed");
                    }
                } else {
                    tracing::warn!(asset_id = %asset, "asset left without a photo document");
                }
                return Err(err.into());
            }
        };

        tracing::info!(%doc_id, asset_id = %asset, slug = event_slug, taken_at = %record.taken_at, "upload successful");
        Ok(doc_id)
    }
}
