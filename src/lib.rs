//! # event-photo-gateway
//!
//! HTTP upload gateway for event photos. A client posts a multipart form
//! with a photo and an event slug; the gateway reads the capture time from
//! the photo's EXIF metadata, resolves the event in a Sanity content store,
//! uploads the image as an asset, and creates a `photo` document linking the
//! two. All persistence is delegated to the content store; this service is
//! a coordination layer.
//!
//! ## Architecture
//!
//! ```text
//! Clients (multipart POST /upload)
//!     │
//!     ├── Origin guard + CORS (api/middleware)
//!     ├── Upload handler (api/handlers)
//!     │
//!     ├── UploadService (service/)
//!     ├── EXIF capture time (domain/)
//!     │
//!     └── ContentStore (store/) ── Sanity HTTP API
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
