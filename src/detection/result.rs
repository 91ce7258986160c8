//! Detection result assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handling::ParserErrorCode;
use crate::signatures::{Category, DetectedService};

/// Outcome of one detection run, as returned by the endpoint.
///
/// `chat_widgets`, `analytics` and `messengers` partition `detected`: every
/// detected service appears in exactly one of them, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserResult {
    pub url: String,
    pub detected: Vec<DetectedService>,
    pub chat_widgets: Vec<DetectedService>,
    pub analytics: Vec<DetectedService>,
    pub messengers: Vec<DetectedService>,
    pub timestamp: DateTime<Utc>,
    /// Diagnostic code on the graceful-fallback body, for operators only
    #[serde(rename = "_error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParserErrorCode>,
}

impl ParserResult {
    /// Builds a result from detector output, deriving the category views.
    pub fn from_detected(url: impl Into<String>, detected: Vec<DetectedService>) -> Self {
        let by_category = |category: Category| -> Vec<DetectedService> {
            detected
                .iter()
                .filter(|service| service.category == category)
                .cloned()
                .collect()
        };
        let chat_widgets = by_category(Category::Chat);
        let analytics = by_category(Category::Analytics);
        let messengers = by_category(Category::Messenger);

        Self {
            url: url.into(),
            detected,
            chat_widgets,
            analytics,
            messengers,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Empty but well-formed result carrying a diagnostic code.
    pub fn fallback(url: impl Into<String>, code: ParserErrorCode) -> Self {
        Self {
            error: Some(code),
            ..Self::from_detected(url, Vec::new())
        }
    }

    /// `true` when at least one service was detected.
    pub fn has_detections(&self) -> bool {
        !self.detected.is_empty()
    }
}
