//! event-photo-gateway server entry point.
//!
//! Starts the Axum HTTP server with the upload endpoint.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use event_photo_gateway::api;
use event_photo_gateway::app_state::AppState;
use event_photo_gateway::config::GatewayConfig;
use event_photo_gateway::service::UploadService;
use event_photo_gateway::store::{ContentStore, SanityClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = GatewayConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        addr = %config.listen_addr,
        project = %config.store.project_id,
        dataset = %config.store.dataset,
        api_version = %config.store.api_version,
        "starting event-photo-gateway"
    );

    // Build store and service layer
    let store: Arc<dyn ContentStore> =
        Arc::new(SanityClient::new(&config.store).context("failed to build content store client")?);
    let upload_service = Arc::new(UploadService::new(store, config.cleanup_orphaned_assets));

    // Build application state
    let app_state = AppState {
        upload_service,
        cors: Arc::new(config.cors.clone()),
        max_upload_bytes: config.max_upload_bytes,
    };

    // Build router
    let app = api::build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received terminate signal"),
    }
    tracing::info!("shutting down");
}
