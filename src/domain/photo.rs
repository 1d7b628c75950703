//! Photo upload and the document persisted for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssetId, EventRef};

/// Document type written for every successful upload.
pub const PHOTO_DOCUMENT_TYPE: &str = "photo";

/// A file received in the `file` multipart field.
///
/// Lives only for the duration of one request.
#[derive(Clone)]
pub struct UploadedPhoto {
    /// Original filename as sent by the client.
    pub filename: String,
    /// Content type declared for the part, if any.
    pub content_type: Option<String>,
    /// Full file content.
    pub data: bytes::Bytes,
}

impl std::fmt::Debug for UploadedPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedPhoto")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Reference to another document, in the store's `{_type, _ref}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Always `"reference"`.
    #[serde(rename = "_type")]
    pub kind: String,
    /// Id of the referenced document or asset.
    #[serde(rename = "_ref")]
    pub target: String,
}

impl Reference {
    /// Builds a reference to `target`.
    #[must_use]
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            kind: "reference".to_string(),
            target: target.into(),
        }
    }
}

/// Image field wrapping the asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    /// Always `"image"`.
    #[serde(rename = "_type")]
    pub kind: String,
    /// Reference to the uploaded asset.
    pub asset: Reference,
}

/// Photo document linking an uploaded asset to an event.
///
/// Serializes to the exact shape the content store expects for a `create`
/// mutation. Created once per upload, never updated by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Document type, `"photo"`.
    #[serde(rename = "_type")]
    pub kind: String,
    /// Original filename.
    pub name: String,
    /// Image field pointing at the uploaded asset.
    pub image: ImageField,
    /// Capture time from EXIF, or ingestion time when unavailable.
    pub taken_at: DateTime<Utc>,
    /// Ingestion time.
    pub created_at: DateTime<Utc>,
    /// Event the photo belongs to.
    pub event: Reference,
}

impl PhotoRecord {
    /// Assembles the document for an uploaded asset.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        asset: &AssetId,
        event: &EventRef,
        taken_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: PHOTO_DOCUMENT_TYPE.to_string(),
            name: name.into(),
            image: ImageField {
                kind: "image".to_string(),
                asset: Reference::to(asset.as_str()),
            },
            taken_at,
            created_at,
            event: Reference::to(event.id.as_str()),
        }
    }

    /// Id of the asset this record points at.
    #[must_use]
    pub fn asset_ref(&self) -> &str {
        &self.image.asset.target
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn record_serializes_in_store_shape() {
        let taken = Utc.with_ymd_and_hms(2023, 8, 1, 10, 0, 0).single();
        let created = Utc.with_ymd_and_hms(2023, 8, 2, 9, 30, 0).single();
        let (Some(taken), Some(created)) = (taken, created) else {
            unreachable!("valid timestamps");
        };
        let record = PhotoRecord::new(
            "IMG_0001.jpg",
            &AssetId::new("image-abc-10x10-jpg"),
            &EventRef::new("event-42"),
            taken,
            created,
        );

        let json = serde_json::to_value(&record).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "_type": "photo",
                "name": "IMG_0001.jpg",
                "image": {
                    "_type": "image",
                    "asset": {"_type": "reference", "_ref": "image-abc-10x10-jpg"}
                },
                "takenAt": "2023-08-01T10:00:00Z",
                "createdAt": "2023-08-02T09:30:00Z",
                "event": {"_type": "reference", "_ref": "event-42"}
            }))
        );
        assert_eq!(record.asset_ref(), "image-abc-10x10-jpg");
    }
}
