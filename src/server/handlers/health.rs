//! Liveness handler.

use axum::extract::State;
use axum::Json;

use super::super::types::{AppState, HealthResponse};

/// Reports liveness and the number of loaded signatures
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        signatures: state.parser.catalog().len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
