//! Service layer: business logic orchestration.
//!
//! [`UploadService`] runs the ingestion pipeline against a
//! [`crate::store::ContentStore`].

pub mod upload_service;

pub use upload_service::UploadService;
