//! Error handling.
//!
//! This module provides:
//! - The detection error taxonomy (`TIMEOUT`, `INVALID_URL`, `FETCH_FAILED`, `PARSE_ERROR`)
//! - Categorization of transport errors into that taxonomy
//! - Error enums for the catalog, the client cache store, the client transport,
//!   configuration and start-up

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, parser_error_from_reqwest};
pub use types::{
    ClientError, ConfigError, InitializationError, ParserError, ParserErrorCode, SignatureError,
    StoreError,
};
