//! Domain layer: upload payloads, store identifiers, the photo document,
//! and EXIF capture-time extraction.

pub mod capture_time;
pub mod photo;
pub mod store_id;

pub use photo::{PhotoRecord, Reference, UploadedPhoto};
pub use store_id::{AssetId, DocumentId, EventRef};
