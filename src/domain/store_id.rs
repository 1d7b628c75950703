//! Opaque identifiers assigned by the content store.
//!
//! The store owns identifier generation; the gateway only carries the
//! strings around. Separate newtypes keep an asset id from being written
//! where a document or event id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored binary asset (e.g. `image-3f2a…-4032x3024-jpg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

/// Identifier of a persisted document (the `_id` of a photo record).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Resolved event: the internal `_id` of the event document matching a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef {
    /// Internal document id of the event.
    #[serde(rename = "_id")]
    pub id: String,
}

impl AssetId {
    /// Wraps a store-assigned asset id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentId {
    /// Wraps a store-assigned document id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EventRef {
    /// Creates a reference to the event with the given internal id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
