//! Photo upload handler: `POST /upload` and its `OPTIONS` counterpart.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{UploadRequest, UploadResponse};
use crate::app_state::AppState;
use crate::domain::UploadedPhoto;
use crate::error::{ErrorResponse, GatewayError};

/// Name of the multipart part carrying the photo.
pub const FILE_FIELD: &str = "file";

/// Name of the multipart part carrying the event slug.
pub const EVENT_SLUG_FIELD: &str = "eventSlug";

/// Parsed multipart form. Only the first `file` and `eventSlug` parts count.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedPhoto>,
    event_slug: Option<String>,
    ignored: Vec<String>,
}

impl UploadForm {
    /// Reads every part of the body before anything else happens.
    async fn read(multipart: &mut Multipart) -> Result<Self, GatewayError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| GatewayError::Multipart(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);

            match (name.as_str(), filename) {
                (FILE_FIELD, Some(filename)) if form.file.is_none() => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| GatewayError::Multipart(e.to_string()))?;
                    // An empty part is what browsers send for an untouched file input.
                    if !data.is_empty() {
                        form.file = Some(UploadedPhoto {
                            filename,
                            content_type,
                            data,
                        });
                    }
                }
                (EVENT_SLUG_FIELD, None) if form.event_slug.is_none() => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| GatewayError::Multipart(e.to_string()))?;
                    let value = value.trim();
                    if !value.is_empty() {
                        form.event_slug = Some(value.to_string());
                    }
                }
                _ => form.ignored.push(name.clone()),
            }
        }

        Ok(form)
    }
}

/// `POST /upload`: store a photo against an event.
///
/// # Errors
///
/// Returns [`GatewayError`] for a missing file or slug, an unknown event,
/// a malformed body, or a content-store failure.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Upload",
    summary = "Upload a photo",
    description = "Accepts a multipart form with a `file` part and an `eventSlug` part. The capture time is read from EXIF (falling back to the ingestion time), the image is uploaded to the content store, and a photo document linked to the event is created.",
    request_body(content = UploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored", body = UploadResponse),
        (status = 400, description = "No file or missing eventSlug", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 404, description = "No event with that slug", body = ErrorResponse),
        (status = 500, description = "Malformed body or content store failure", body = ErrorResponse),
    )
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    // A body that is not multipart at all (empty, JSON, url-encoded) carries
    // no file part. A broken multipart stream still fails while reading.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "request body is not multipart");
        GatewayError::NoFile
    })?;
    let form = UploadForm::read(&mut multipart).await?;
    tracing::debug!(
        file = ?form.file,
        event_slug = ?form.event_slug,
        ignored = ?form.ignored,
        "form parsed"
    );

    let photo = form.file.ok_or(GatewayError::NoFile)?;
    let event_slug = form.event_slug.ok_or(GatewayError::MissingEventSlug)?;

    let doc_id = state.upload_service.ingest(photo, &event_slug).await?;

    Ok(Json(UploadResponse {
        success: true,
        doc_id: doc_id.to_string(),
    }))
}

/// `OPTIONS /upload`: plain `OPTIONS` request (CORS preflights are
/// answered by the CORS layer before reaching this handler).
pub async fn upload_options() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::ALLOW, "POST, OPTIONS")])
}

/// Upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_photo).options(upload_options))
}
