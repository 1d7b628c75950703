//! Content store layer: the remote collaborator that holds events, image
//! assets and photo documents.
//!
//! [`ContentStore`] is the narrow request/response contract the gateway
//! relies on. [`SanityClient`] talks to the Sanity HTTP API;
//! [`InMemoryStore`] keeps everything in process and records each call.

pub mod memory;
pub mod sanity;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{AssetId, DocumentId, EventRef, PhotoRecord};
use crate::error::StoreError;

pub use memory::{InMemoryStore, StoreCall};
pub use sanity::SanityClient;

/// Operations the gateway needs from the content store.
///
/// Implementations must be cheap to share across requests; the gateway
/// holds one instance behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug {
    /// Looks up the event whose `slug.current` equals `slug`.
    ///
    /// Returns `Ok(None)` when no such event exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query cannot be executed.
    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<EventRef>, StoreError>;

    /// Uploads an image binary and returns the new asset id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the upload is rejected or fails in transit.
    async fn upload_image_asset(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<AssetId, StoreError>;

    /// Persists a photo document and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the mutation is rejected or fails in transit.
    async fn create_document(&self, record: &PhotoRecord) -> Result<DocumentId, StoreError>;

    /// Deletes an asset. Used only to clean up after a failed document create.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the deletion is rejected or fails in transit.
    async fn delete_asset(&self, asset: &AssetId) -> Result<(), StoreError>;
}
