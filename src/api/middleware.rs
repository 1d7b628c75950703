//! Cross-origin enforcement.
//!
//! [`cors_layer`] adds the CORS response headers browsers need;
//! [`enforce_origin`] rejects requests from origins outside the allowlist
//! before they reach any handler, so a blocked origin never causes a store
//! call.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::app_state::AppState;
use crate::config::CorsPolicy;
use crate::error::GatewayError;

/// Builds the CORS header layer for `policy`.
#[must_use]
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    match policy {
        CorsPolicy::Permissive => {
            tracing::warn!("CORS configured to allow all origins");
            CorsLayer::permissive()
        }
        CorsPolicy::Allowlist(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers(AllowHeaders::mirror_request())
        }
    }
}

/// Rejects requests whose `Origin` header is not allowed by the policy.
///
/// Requests without an `Origin` header (curl, server-to-server) pass.
///
/// # Errors
///
/// Returns [`GatewayError::OriginNotAllowed`] for blocked origins.
pub async fn enforce_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let blocked = match request.headers().get(header::ORIGIN) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(origin) if state.cors.allows(Some(origin)) => None,
            Ok(origin) => Some(origin.to_string()),
            Err(_) => Some(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        },
    };
    if let Some(origin) = blocked {
        return Err(GatewayError::OriginNotAllowed(origin));
    }
    Ok(next.run(request).await)
}
