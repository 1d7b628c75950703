//! Test helpers: EXIF fixtures, multipart bodies, and an app wired to an
//! in-memory content store.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use event_photo_gateway::api::build_router;
use event_photo_gateway::app_state::AppState;
use event_photo_gateway::config::CorsPolicy;
use event_photo_gateway::service::UploadService;
use event_photo_gateway::store::{ContentStore, InMemoryStore};

/// EXIF tag numbers used by the fixtures.
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const OFFSET_TIME_ORIGINAL: u16 = 0x9011;
pub const SUB_SEC_TIME_ORIGINAL: u16 = 0x9291;

const EXIF_IFD_POINTER: u16 = 0x8769;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
/// IFD0 (8-byte header + one entry) ends here; the Exif IFD follows.
const EXIF_IFD_OFFSET: u32 = 26;

fn push_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&kind.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&value);
}

/// Builds a minimal big-endian TIFF block whose Exif IFD holds the given
/// ASCII tags.
fn tiff_with_ascii_tags(tags: &[(u16, &str)]) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());

    // IFD0: a single pointer to the Exif IFD, no next IFD.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    push_entry(&mut tiff, EXIF_IFD_POINTER, TYPE_LONG, 1, EXIF_IFD_OFFSET.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(tiff.len(), EXIF_IFD_OFFSET as usize);

    let count = u16::try_from(tags.len()).unwrap_or(u16::MAX);
    let data_start = EXIF_IFD_OFFSET + 2 + 12 * u32::from(count) + 4;
    let mut data = Vec::new();

    tiff.extend_from_slice(&count.to_be_bytes());
    for (tag, text) in tags {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(&bytes);
            push_entry(&mut tiff, *tag, TYPE_ASCII, len, inline);
        } else {
            let offset = data_start + u32::try_from(data.len()).unwrap_or(u32::MAX);
            push_entry(&mut tiff, *tag, TYPE_ASCII, len, offset.to_be_bytes());
            data.extend_from_slice(&bytes);
        }
    }
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(&data);
    tiff
}

/// Builds a JPEG consisting of SOI, an APP1 Exif segment, and EOI.
///
/// Not decodable as an image, but enough for EXIF readers.
pub fn jpeg_with_exif(tags: &[(u16, &str)]) -> Vec<u8> {
    let tiff = tiff_with_ascii_tags(tags);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap_or(u16::MAX);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

/// JPEG captured at 2023-08-01 10:00:00 (no offset tag).
pub fn summer_fair_jpeg() -> Vec<u8> {
    jpeg_with_exif(&[(DATE_TIME_ORIGINAL, "2023:08:01 10:00:00")])
}

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "gateway-test-boundary-7MA4YWxkTrZu0gW";

/// One multipart part.
pub struct Part {
    pub name: &'static str,
    pub filename: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn file(filename: &'static str, data: Vec<u8>) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content_type: Some("image/jpeg"),
            data,
        }
    }

    pub fn text(name: &'static str, value: &str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

/// Encodes `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                part.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// `POST /upload` request carrying `parts`, optionally from `origin`.
pub fn upload_request(parts: &[Part], origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    let Ok(request) = builder.body(Body::from(multipart_body(parts))) else {
        panic!("request should build");
    };
    request
}

/// Router plus the store behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// App with the default allowlist, a `summer-fair` event, and a 1 MiB
    /// body limit.
    pub fn new() -> Self {
        Self::with(CorsPolicy::default(), 1024 * 1024)
    }

    pub fn with(cors: CorsPolicy, max_upload_bytes: usize) -> Self {
        let store = Arc::new(InMemoryStore::new().with_event("summer-fair", "event-summer-fair"));
        let service = UploadService::new(Arc::clone(&store) as Arc<dyn ContentStore>, false);
        let router = build_router(AppState {
            upload_service: Arc::new(service),
            cors: Arc::new(cors),
            max_upload_bytes,
        });
        Self { router, store }
    }

    /// Sends one request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router is infallible");
        };
        response
    }

    /// Sends one request and decodes the JSON body.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.send(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body should be JSON: {}", String::from_utf8_lossy(&bytes));
        };
        (status, json)
    }
}
