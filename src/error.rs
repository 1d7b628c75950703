//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for request handling. Each
//! variant maps to a fixed HTTP status code and a fixed, caller-safe
//! message. Root causes of server-side failures are logged and never
//! included in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// { "error": "Missing eventSlug" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant              | HTTP Status                 |
/// |----------------------|-----------------------------|
/// | `NoFile`             | 400 Bad Request             |
/// | `MissingEventSlug`   | 400 Bad Request             |
/// | `OriginNotAllowed`   | 403 Forbidden               |
/// | `EventNotFound`      | 404 Not Found               |
/// | `Multipart`          | 500 Internal Server Error   |
/// | `Store`              | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The multipart body carried no usable `file` field.
    #[error("no file received")]
    NoFile,

    /// The `eventSlug` field was absent or blank.
    #[error("missing eventSlug")]
    MissingEventSlug,

    /// No event exists with the supplied slug.
    #[error("event not found for slug {0:?}")]
    EventNotFound(String),

    /// The request body could not be parsed as multipart form data.
    #[error("multipart parse error: {0}")]
    Multipart(String),

    /// A content-store call failed.
    #[error("content store error: {0}")]
    Store(#[from] StoreError),

    /// The request's `Origin` is not on the allowlist.
    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::MissingEventSlug => StatusCode::BAD_REQUEST,
            Self::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::Multipart(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to the caller.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::NoFile => "No file received",
            Self::MissingEventSlug => "Missing eventSlug",
            Self::EventNotFound(_) => "Event not found for given slug",
            Self::Multipart(_) => "Upload error",
            Self::Store(_) => "Sanity upload failed",
            Self::OriginNotAllowed(_) => "Not allowed by CORS",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Multipart(_) | Self::Store(_) => tracing::error!(error = %self, "upload failed"),
            Self::OriginNotAllowed(origin) => tracing::warn!(%origin, "blocked cors origin"),
            _ => tracing::info!(%status, error = %self, "upload rejected"),
        }
        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

/// Failure talking to the remote content store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response (connect error, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {body}")]
    Status {
        /// HTTP status returned by the store.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The store answered 2xx but the body did not have the expected shape.
    #[error("unexpected store response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Startup configuration failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be parsed.
    #[error("invalid value {value:?} for {key}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn body_of(err: GatewayError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body should be json");
        };
        (status, json)
    }

    #[tokio::test]
    async fn client_errors_carry_descriptive_messages() {
        let (status, json) = body_of(GatewayError::NoFile).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"error": "No file received"}));

        let (status, json) = body_of(GatewayError::MissingEventSlug).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"error": "Missing eventSlug"}));

        let (status, json) = body_of(GatewayError::EventNotFound("nope".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({"error": "Event not found for given slug"}));
    }

    #[tokio::test]
    async fn server_errors_hide_root_cause() {
        let (status, json) = body_of(GatewayError::Multipart("boundary missing".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({"error": "Upload error"}));

        let store = StoreError::Status {
            status: 401,
            body: "token sk-secret rejected".into(),
        };
        let (status, json) = body_of(GatewayError::from(store)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({"error": "Sanity upload failed"}));
    }

    #[test]
    fn origin_rejection_is_forbidden() {
        let err = GatewayError::OriginNotAllowed("https://evil.example".into());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
