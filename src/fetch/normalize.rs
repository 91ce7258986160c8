//! URL validation and normalization utilities.
//!
//! The same normalizer is used by the endpoint and by the client layer, so a
//! cache key computed on one side always matches the URL fetched on the other.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::config::MAX_URL_LENGTH;

static SCHEME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern SCHEME_PATTERN: {}. This is a programming error.",
            e
        )
    })
});

/// Normalizes user input into an absolute http(s) URL.
///
/// Trims the input, prepends `https://` when no scheme is present, then checks that
/// the result parses as an absolute URL with an http/https scheme and a host.
/// Input that is empty, contains inner whitespace, exceeds `MAX_URL_LENGTH`, or
/// uses another scheme is rejected.
///
/// Pure and idempotent: `normalize_url(&normalize_url(x)?) == normalize_url(x)`.
///
/// # Returns
///
/// `Some(normalized_url)` if the URL is usable, `None` otherwise.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().any(char::is_whitespace) {
        debug!("Rejecting URL with inner whitespace: {trimmed}");
        return None;
    }

    let normalized = if SCHEME_PATTERN.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    // Check after adding the prefix, which can push a borderline URL over the limit
    if normalized.len() > MAX_URL_LENGTH {
        debug!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            normalized.chars().take(50).collect::<String>()
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => {
                Some(normalized)
            }
            _ => {
                debug!("Rejecting unsupported URL: {trimmed}");
                None
            }
        },
        Err(e) => {
            debug!("Rejecting invalid URL {trimmed}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(
            normalize_url("example.ru"),
            Some("https://example.ru".to_string())
        );
    }

    #[test]
    fn test_normalize_url_trims_input() {
        assert_eq!(
            normalize_url("  example.ru\n"),
            Some("https://example.ru".to_string())
        );
    }

    #[test]
    fn test_normalize_url_preserves_scheme() {
        assert_eq!(
            normalize_url("http://example.com"),
            Some("http://example.com".to_string())
        );
        assert_eq!(
            normalize_url("https://example.com/contacts"),
            Some("https://example.com/contacts".to_string())
        );
    }

    #[test]
    fn test_normalize_url_rejects_empty() {
        assert_eq!(normalize_url(""), None);
        assert_eq!(normalize_url("   "), None);
    }

    #[test]
    fn test_normalize_url_rejects_not_a_url() {
        assert_eq!(normalize_url("not a url"), None);
    }

    #[test]
    fn test_normalize_url_rejects_other_schemes() {
        assert_eq!(normalize_url("ftp://example.com"), None);
        assert_eq!(normalize_url("javascript://alert(1)"), None);
    }

    #[test]
    fn test_normalize_url_with_port_and_path() {
        assert_eq!(
            normalize_url("example.com:8080/path?query=value"),
            Some("https://example.com:8080/path?query=value".to_string())
        );
    }

    #[test]
    fn test_normalize_url_rejects_too_long() {
        let url = format!("example.com/{}", "a".repeat(2045));
        assert_eq!(normalize_url(&url), None);
    }

    #[test]
    fn test_normalize_url_long_multibyte_input_does_not_panic() {
        let url = format!("пример.рф/{}", "ж".repeat(2000));
        assert_eq!(normalize_url(&url), None);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_url_normalization_idempotent(input in "[ a-zA-Z0-9:/.\\-]{0,40}") {
            if let Some(n1) = normalize_url(&input) {
                let n2 = normalize_url(&n1);
                prop_assert_eq!(Some(n1.clone()), n2,
                    "Normalizing twice should produce same result");
            }
        }

        #[test]
        fn test_url_scheme_handling(domain in "[a-z]{3,20}\\.[a-z]{2,5}") {
            let no_scheme = normalize_url(&domain);
            prop_assert_eq!(no_scheme, Some(format!("https://{}", domain)));

            let http_url = format!("http://{}", domain);
            prop_assert_eq!(normalize_url(&http_url), Some(http_url.clone()));
        }
    }
}
