//! Detection endpoint handler.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::FutureExt;
use log::{debug, error, warn};

use super::super::types::{ApiError, AppState, FieldIssue, ParseRequest};
use crate::config::{CACHE_CONTROL_FALLBACK, CACHE_CONTROL_SUCCESS};
use crate::detection::ParserResult;
use crate::error_handling::ParserErrorCode;
use crate::fetch::{normalize_url, ParseOptions};

/// `POST /api/parse-website`
///
/// Malformed requests get a 400. Once the URL is accepted the response is always a
/// 200: a detection failure yields an empty result carrying `_error`, cached for a
/// shorter period than a successful one.
pub async fn parse_website_handler(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected parse request body: {}", rejection.body_text());
            return ApiError::validation(vec![FieldIssue::new("body", rejection.body_text())])
                .into_response();
        }
    };

    let (raw_url, mode) = match request.validate() {
        Ok(valid) => valid,
        Err(issues) => return ApiError::validation(issues).into_response(),
    };

    let Some(url) = normalize_url(&raw_url) else {
        return ApiError::invalid_url(&raw_url).into_response();
    };

    let options = ParseOptions {
        mode,
        timeout: state.timeout,
    };
    let parser = Arc::clone(&state.parser);
    let target = url.clone();
    let outcome = AssertUnwindSafe(async move { parser.parse_website(&target, options).await })
        .catch_unwind()
        .await;

    let (result, cache_control) = match outcome {
        Ok(Ok(result)) => (result, CACHE_CONTROL_SUCCESS),
        Ok(Err(e)) => {
            warn!("Detection failed for {}: {}", url, e);
            (ParserResult::fallback(&url, e.code), CACHE_CONTROL_FALLBACK)
        }
        Err(_) => {
            error!("Detection panicked for {}", url);
            (
                ParserResult::fallback(&url, ParserErrorCode::ParseError),
                CACHE_CONTROL_FALLBACK,
            )
        }
    };

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, cache_control)],
        Json(result),
    )
        .into_response()
}
