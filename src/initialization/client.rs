//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Maximum number of redirect hops followed by the outbound fetch
const MAX_REDIRECT_HOPS: usize = 5;

/// Initializes the HTTP client used for the outbound site fetch.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - TCP connect timeout (`TCP_CONNECT_TIMEOUT_SECS`)
/// - Redirect following limited to `MAX_REDIRECT_HOPS`
///
/// The per-request deadline is not set here; `SiteParser` enforces it on each call.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .build()?;
    Ok(client)
}
