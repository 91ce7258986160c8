//! Signature listing handler.

use axum::extract::{Query, State};
use axum::Json;

use super::super::types::{AppState, SignaturesQuery};
use crate::signatures::SignatureSummary;

/// Lists the loaded signatures, optionally restricted to one category
pub async fn signatures_handler(
    State(state): State<AppState>,
    Query(query): Query<SignaturesQuery>,
) -> Json<Vec<SignatureSummary>> {
    let catalog = state.parser.catalog();
    let summaries = match query.category {
        Some(category) => catalog
            .by_category(category)
            .map(SignatureSummary::from)
            .collect(),
        None => catalog.entries().iter().map(SignatureSummary::from).collect(),
    };
    Json(summaries)
}
