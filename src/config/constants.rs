//! Configuration constants.
//!
//! This module defines the timeouts, size limits, cache lifetimes and header values
//! shared by the detection endpoint and its client layer.

use std::time::Duration;

/// Default deadline for the outbound site fetch in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;
/// Lower bound accepted for `--timeout-ms`
pub const MIN_FETCH_TIMEOUT_MS: u64 = 100;
/// Upper bound accepted for `--timeout-ms`
pub const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;

/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for the outbound fetch.
///
/// Identifies the product to site operators. Can be overridden with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; WidgetScout/",
    env!("CARGO_PKG_VERSION"),
    "; widget detection)"
);

/// Accept header sent with the outbound fetch
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

// Response and body size limits
/// Maximum HTML sample handed to the detector (500KB).
/// Bounds regex cost and memory on adversarial responses.
pub const MAX_HTML_SAMPLE_BYTES: usize = 500 * 1024;

/// Maximum URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

// Endpoint cache headers
/// `Cache-Control` attached to a confirmed detection result (24h)
pub const CACHE_CONTROL_SUCCESS: &str = "public, max-age=86400";
/// `Cache-Control` attached to the graceful-fallback body (1h)
pub const CACHE_CONTROL_FALLBACK: &str = "public, max-age=3600";

// Client layer timing
/// Debounce window applied to user input before a request is issued
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(800);
/// Lifetime of a client cache entry (24h)
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Fixed key under which the client cache map is persisted
pub const CACHE_STORAGE_KEY: &str = "widget_scout.parser_cache";
/// Capacity of the broadcast channel carrying settled results
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

// Server defaults
/// Default bind address for `serve`
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
/// Default port for `serve`
pub const DEFAULT_PORT: u16 = 3000;
/// Path of the detection endpoint
pub const PARSE_WEBSITE_PATH: &str = "/api/parse-website";
