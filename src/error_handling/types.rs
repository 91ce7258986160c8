//! Error type definitions.
//!
//! This module defines the detection error taxonomy and the error enums used by
//! the catalog, the client layer, configuration and start-up.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Failure kinds a single detection request can end in.
///
/// Rendered as `TIMEOUT`, `INVALID_URL`, `FETCH_FAILED`, `PARSE_ERROR` both in JSON
/// and through `Display`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParserErrorCode {
    /// Deadline elapsed before the site answered
    Timeout,
    /// Input could not be normalized into an absolute http(s) URL
    InvalidUrl,
    /// Non-2xx status or transport failure (DNS, connect, redirect loop)
    FetchFailed,
    /// Anything unexpected while reading or handling the body
    ParseError,
}

/// Terminal error for one detection request. Never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ParserError {
    /// Failure kind
    pub code: ParserErrorCode,
    /// Human-readable detail, for operators
    pub message: String,
}

impl ParserError {
    /// Creates an error of the given kind.
    pub fn new(code: ParserErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ParserErrorCode::Timeout, message)
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::new(ParserErrorCode::FetchFailed, message)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ParserErrorCode::ParseError, message)
    }
}

/// Errors raised while loading a signature table.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// The table could not be read from disk.
    #[error("Failed to read signature table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid JSON or has unknown category/jurisdiction values.
    #[error("Failed to parse signature table: {0}")]
    Parse(#[from] serde_json::Error),

    /// A pattern failed to compile.
    #[error("Invalid pattern for signature '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    /// Two entries share an id.
    #[error("Duplicate signature id '{0}'")]
    DuplicateId(String),

    /// An entry has an empty id or name.
    #[error("Signature at position {0} has an empty id or name")]
    EmptyField(usize),
}

/// Errors from the key-value store behind the client cache.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure in a file-backed store.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the write because it is full.
    #[error("Storage quota exceeded ({limit} bytes)")]
    QuotaExceeded { limit: usize },

    /// The store lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors from the client-side transport to the detection endpoint.
///
/// These never reach the UI layer; the subscription settles with no data instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The endpoint answered with a non-2xx status.
    #[error("Detection endpoint returned HTTP {0}")]
    Status(u16),

    /// The request could not be sent or the body could not be decoded.
    #[error("Detection request failed: {0}")]
    Transport(#[from] ReqwestError),
}

/// Configuration validation failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Timeout {value}ms is outside the accepted range {min}..={max}ms")]
    InvalidTimeout { value: u64, min: u64, max: u64 },

    #[error("User-Agent must not be empty")]
    EmptyUserAgent,

    #[error("Bind address must not be empty")]
    EmptyBindAddress,
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error loading the signature table.
    #[error("Signature catalog initialization error: {0}")]
    CatalogError(#[from] SignatureError),
}
