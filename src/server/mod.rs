//! HTTP endpoint exposing the detector.
//!
//! Provides three routes:
//! - `POST /api/parse-website` - detect services on a site
//! - `GET /api/signatures` - list loaded signatures (optional `?category=`)
//! - `GET /health` - liveness and catalog size

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::PARSE_WEBSITE_PATH;
use handlers::{health_handler, parse_website_handler, signatures_handler};
pub use types::{ApiError, AppState, FieldIssue, HealthResponse, ParseRequest, SignaturesQuery};

/// Builds the router with all endpoint routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(PARSE_WEBSITE_PATH, post(parse_website_handler))
        .route("/api/signatures", get(signatures_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves the endpoint on an already bound listener until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Endpoint server error: {}", e))?;

    info!("Endpoint server stopped");
    Ok(())
}

/// Binds `bind_address:port` and serves the endpoint until `shutdown` is cancelled
pub async fn start_server(
    bind_address: &str,
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind((bind_address, port)).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind endpoint to {}:{}: {}",
            bind_address,
            port,
            e
        )
    })?;

    info!("Endpoint listening on http://{}:{}/", bind_address, port);
    info!("  - Detect: POST http://{}:{}{}", bind_address, port, PARSE_WEBSITE_PATH);
    info!("  - Signatures: http://{}:{}/api/signatures", bind_address, port);

    serve(listener, state, shutdown).await
}
