//! In-process [`ContentStore`] used by tests and local runs.
//!
//! Holds events, assets and documents in a `tokio::sync::RwLock` and keeps
//! an ordered log of every call, so callers can assert what reached the
//! store and in which order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::ContentStore;
use crate::domain::{AssetId, DocumentId, EventRef, PhotoRecord};
use crate::error::StoreError;

/// One call received by an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `find_event_by_slug` with the given slug.
    FindEvent(String),
    /// `upload_image_asset` with the given filename.
    UploadAsset(String),
    /// `create_document`.
    CreateDocument,
    /// `delete_asset` for the given asset.
    DeleteAsset(AssetId),
}

/// Metadata kept for an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Filename the asset was uploaded under.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// Size in bytes.
    pub size: usize,
}

#[derive(Debug, Default)]
struct State {
    events: HashMap<String, EventRef>,
    assets: HashMap<AssetId, StoredAsset>,
    documents: Vec<(DocumentId, PhotoRecord)>,
    calls: Vec<StoreCall>,
}

/// Content store kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    fail_uploads: AtomicBool,
    fail_creates: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store with no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event reachable under `slug`.
    #[must_use]
    pub fn with_event(mut self, slug: impl Into<String>, id: impl Into<String>) -> Self {
        self.state.get_mut().events.insert(slug.into(), EventRef::new(id));
        self
    }

    /// Makes subsequent asset uploads fail.
    pub fn fail_asset_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent document creations fail.
    pub fn fail_document_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.read().await.calls.clone()
    }

    /// Documents created so far, in order.
    pub async fn documents(&self) -> Vec<(DocumentId, PhotoRecord)> {
        self.state.read().await.documents.clone()
    }

    /// Looks up a created document by id.
    pub async fn document(&self, id: &DocumentId) -> Option<PhotoRecord> {
        self.state
            .read()
            .await
            .documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, record)| record.clone())
    }

    /// Assets currently stored.
    pub async fn assets(&self) -> HashMap<AssetId, StoredAsset> {
        self.state.read().await.assets.clone()
    }
}

fn injected_failure(operation: &str) -> StoreError {
    StoreError::Status {
        status: 503,
        body: format!("{operation} failure injected"),
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<EventRef>, StoreError> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::FindEvent(slug.to_string()));
        Ok(state.events.get(slug).cloned())
    }

    async fn upload_image_asset(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<AssetId, StoreError> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::UploadAsset(filename.to_string()));
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(injected_failure("asset upload"));
        }
        let id = AssetId::new(format!("image-{}", uuid::Uuid::new_v4().simple()));
        state.assets.insert(
            id.clone(),
            StoredAsset {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                size: data.len(),
            },
        );
        Ok(id)
    }

    async fn create_document(&self, record: &PhotoRecord) -> Result<DocumentId, StoreError> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::CreateDocument);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(injected_failure("document create"));
        }
        let asset = AssetId::new(record.asset_ref());
        if !state.assets.contains_key(&asset) {
            return Err(StoreError::Status {
                status: 409,
                body: format!("reference to missing asset {asset}"),
            });
        }
        let id = DocumentId::new(uuid::Uuid::new_v4().to_string());
        state.documents.push((id.clone(), record.clone()));
        Ok(id)
    }

    async fn delete_asset(&self, asset: &AssetId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::DeleteAsset(asset.clone()));
        state.assets.remove(asset);
        Ok(())
    }
}
