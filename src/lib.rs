//! widget_scout library: detection of third-party chat widgets, analytics trackers
//! and messenger integrations on websites
//!
//! The library fetches a site's HTML once, matches it against a data-driven table of
//! signatures, and reports which services are installed along with their legal
//! jurisdiction. It also ships the HTTP endpoint that exposes detection and the
//! client-side layer (debounce, cache, stale-response suppression) that consumes it.
//!
//! # Example
//!
//! ```no_run
//! use widget_scout::initialization::init_site_parser;
//! use widget_scout::{normalize_url, Config, ParseOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = init_site_parser(&Config::default())?;
//! let url = normalize_url("example.ru").ok_or("invalid url")?;
//! let result = parser.parse_website(&url, ParseOptions::default()).await?;
//! for service in &result.detected {
//!     println!("{} ({})", service.name, service.jurisdiction);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod client;
pub mod clock;
pub mod config;
pub mod detection;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod server;
pub mod signatures;

// Re-export public API
pub use config::{Cli, Command, Config, LogFormat, LogLevel};
pub use detection::{detect, DetectionMode, ParserResult};
pub use error_handling::{ParserError, ParserErrorCode};
pub use fetch::{normalize_url, ParseOptions, SiteParser};
pub use signatures::{Category, DetectedService, Jurisdiction, SignatureCatalog};
