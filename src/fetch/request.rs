//! HTTP request building and bounded body reading.

use crate::config::ACCEPT_HTML;

/// Applies the outbound request headers to a `reqwest::RequestBuilder`.
///
/// The User-Agent is configured on the client itself (see `initialization::init_client`).
pub(crate) fn apply_request_headers(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder.header(reqwest::header::ACCEPT, ACCEPT_HTML)
}

/// Body bytes read from a response, capped at a byte limit.
#[derive(Debug)]
pub(crate) struct CappedBody {
    pub bytes: Vec<u8>,
    /// `true` if the response had more data than the cap
    pub truncated: bool,
}

/// Streams at most `limit` bytes of the response body.
///
/// Stops reading as soon as the cap is reached, so an oversized response is never
/// fully downloaded.
///
/// # Errors
///
/// Returns the `reqwest::Error` raised while reading a chunk.
pub(crate) async fn read_body_capped(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<CappedBody, reqwest::Error> {
    let mut bytes = Vec::with_capacity(limit.min(64 * 1024));
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit - bytes.len();
        if chunk.len() >= remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            return Ok(CappedBody {
                bytes,
                truncated: chunk.len() > remaining,
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(CappedBody {
        bytes,
        truncated: false,
    })
}
