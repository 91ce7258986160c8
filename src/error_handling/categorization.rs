//! Error categorization.
//!
//! Maps transport-level failures onto the detection error taxonomy.

use super::types::{ParserError, ParserErrorCode};

/// Categorizes a `reqwest::Error` into a `ParserErrorCode`.
///
/// - timeouts (client-level) become `Timeout`
/// - status, connect, request and redirect failures become `FetchFailed`
/// - builder failures (the URL was rejected by the client) become `InvalidUrl`
/// - body and decode failures, and anything unrecognized, become `ParseError`
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ParserErrorCode {
    if error.is_timeout() {
        ParserErrorCode::Timeout
    } else if error.is_builder() {
        ParserErrorCode::InvalidUrl
    } else if error.is_status()
        || error.is_connect()
        || error.is_redirect()
        || error.is_request()
    {
        ParserErrorCode::FetchFailed
    } else {
        // is_body(), is_decode() and unknown kinds
        ParserErrorCode::ParseError
    }
}

/// Converts a `reqwest::Error` into a `ParserError`, keeping its message.
pub fn parser_error_from_reqwest(error: &reqwest::Error) -> ParserError {
    ParserError::new(categorize_reqwest_error(error), error.to_string())
}
