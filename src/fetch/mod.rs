//! Site fetching and detection orchestration.
//!
//! This module provides:
//! - `normalize_url`: the shared input normalizer
//! - `SiteParser::parse_website`: one bounded GET followed by signature detection
//!
//! Every failure is mapped to a `ParserError`; nothing here panics or propagates an
//! untyped error to the caller.

mod normalize;
mod request;


use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

use crate::config::{DEFAULT_FETCH_TIMEOUT_MS, MAX_HTML_SAMPLE_BYTES};
use crate::detection::{detect, DetectionMode, ParserResult};
use crate::error_handling::{parser_error_from_reqwest, ParserError};
use crate::signatures::SignatureCatalog;

use request::{apply_request_headers, read_body_capped};
pub use normalize::normalize_url;

/// Per-request options for [`SiteParser::parse_website`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: DetectionMode,
    /// Hard deadline covering connect, response headers and body
    pub timeout: Duration,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: DetectionMode::All,
            timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

/// Fetches a site and runs the detector over its HTML.
#[derive(Debug, Clone)]
pub struct SiteParser {
    client: reqwest::Client,
    catalog: Arc<SignatureCatalog>,
}

impl SiteParser {
    /// Creates a parser around a shared HTTP client and signature catalog.
    pub fn new(client: reqwest::Client, catalog: Arc<SignatureCatalog>) -> Self {
        Self { client, catalog }
    }

    /// The catalog this parser evaluates.
    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    /// Fetches `url` and detects installed services.
    ///
    /// `url` must already be normalized (see [`normalize_url`]).
    ///
    /// # Errors
    ///
    /// - `TIMEOUT` if the deadline elapses before the headers or the body arrive
    /// - `FETCH_FAILED` on a non-2xx status or a transport failure
    /// - `INVALID_URL` if the HTTP client rejects the URL
    /// - `PARSE_ERROR` if the body cannot be read
    pub async fn parse_website(
        &self,
        url: &str,
        options: ParseOptions,
    ) -> Result<ParserResult, ParserError> {
        let deadline = Instant::now() + options.timeout;
        let timeout_ms = options.timeout.as_millis();

        let request = apply_request_headers(self.client.get(url));
        let mut response = match tokio::time::timeout_at(deadline, request.send()).await {
            Err(_) => {
                return Err(ParserError::timeout(format!(
                    "No response from {url} within {timeout_ms}ms"
                )))
            }
            Ok(Err(e)) => return Err(parser_error_from_reqwest(&e)),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::fetch_failed(format!("HTTP {status}")));
        }

        let body =
            match tokio::time::timeout_at(deadline, read_body_capped(&mut response, MAX_HTML_SAMPLE_BYTES))
                .await
            {
                Err(_) => {
                    return Err(ParserError::timeout(format!(
                        "Body of {url} not received within {timeout_ms}ms"
                    )))
                }
                Ok(Err(e)) => {
                    return Err(ParserError::parse_error(format!(
                        "Failed to read body of {url}: {e}"
                    )))
                }
                Ok(Ok(body)) => body,
            };

        if body.truncated {
            debug!(
                "Body of {url} truncated to {} bytes for detection",
                MAX_HTML_SAMPLE_BYTES
            );
        }

        let html = String::from_utf8_lossy(&body.bytes);
        let detected = detect(&self.catalog, &html, options.mode);
        debug!(
            "Detected {} services on {url} (mode: {})",
            detected.len(),
            options.mode
        );

        Ok(ParserResult::from_detected(url, detected))
    }
}
