//! REST API layer: route handlers, DTOs, middleware, and router composition.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete application router.
///
/// Layer order, outermost first: request tracing → origin enforcement →
/// CORS headers → routes. The body limit applies to the upload route only.
pub fn build_router(state: AppState) -> Router {
    let upload_routes = handlers::upload::routes()
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    let app = Router::new()
        .merge(upload_routes)
        .merge(handlers::system::routes())
        .layer(middleware::cors_layer(&state.cors))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::enforce_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(openapi::swagger_router());

    app
}
