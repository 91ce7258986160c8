//! Signature detection over raw HTML text.
//!
//! Matching is plain-text and case-insensitive; markup is never parsed, so
//! malformed documents are handled the same as well-formed ones.
//!
//! Callers must bound the sample with [`truncate_html_sample`] (or an equivalent
//! byte cap) before calling [`detect`].

mod result;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::MAX_HTML_SAMPLE_BYTES;
use crate::signatures::{Category, DetectedService, SignatureCatalog};

pub use result::ParserResult;

/// Which signature categories a detection run evaluates.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DetectionMode {
    /// Every signature
    #[default]
    All,
    /// Chat widgets only
    Widgets,
    /// Analytics trackers only
    Analytics,
    /// Messenger integrations only
    Messengers,
}

impl DetectionMode {
    /// Returns `true` if signatures of `category` are evaluated in this mode.
    pub fn includes(self, category: Category) -> bool {
        match self {
            DetectionMode::All => true,
            DetectionMode::Widgets => category == Category::Chat,
            DetectionMode::Analytics => category == Category::Analytics,
            DetectionMode::Messengers => category == Category::Messenger,
        }
    }
}

/// Evaluates the catalog against an HTML sample.
///
/// Entries are filtered by `mode` before their pattern is evaluated. Output is in
/// catalog definition order, not in order of appearance in the document.
pub fn detect(
    catalog: &SignatureCatalog,
    html_sample: &str,
    mode: DetectionMode,
) -> Vec<DetectedService> {
    catalog
        .entries()
        .iter()
        .filter(|entry| mode.includes(entry.category))
        .filter(|entry| entry.matches(html_sample))
        .map(DetectedService::from)
        .collect()
}

/// Cuts `html` to at most `MAX_HTML_SAMPLE_BYTES`, on a char boundary.
pub fn truncate_html_sample(html: &str) -> &str {
    if html.len() <= MAX_HTML_SAMPLE_BYTES {
        return html;
    }
    let mut end = MAX_HTML_SAMPLE_BYTES;
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[..end]
}
