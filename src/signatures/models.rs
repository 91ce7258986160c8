//! Data structures for signature tables and detection output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Service category a signature belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Live chat / support widgets
    Chat,
    /// Analytics and tracking scripts
    Analytics,
    /// Messenger contact links and integrations
    Messenger,
}

/// Legal jurisdiction of the company operating a service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum Jurisdiction {
    RU,
    US,
    EU,
    LU,
}

/// On-disk representation of one signature, before pattern compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSignature {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub jurisdiction: Jurisdiction,
    pub requires_cross_border: bool,
    pub pattern: String,
}

/// A named, categorized text-matching rule.
///
/// Immutable once the catalog is built.
#[derive(Debug, Clone)]
pub struct SignatureEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub jurisdiction: Jurisdiction,
    /// Whether using the service implies sending personal data abroad
    pub requires_cross_border: bool,
    /// Case-insensitive pattern evaluated against raw HTML text
    pub pattern: Regex,
}

impl SignatureEntry {
    /// Returns `true` if the pattern occurs anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Read-only projection of a matched `SignatureEntry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedService {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub jurisdiction: Jurisdiction,
    pub requires_cross_border: bool,
}

impl From<&SignatureEntry> for DetectedService {
    fn from(entry: &SignatureEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category,
            jurisdiction: entry.jurisdiction,
            requires_cross_border: entry.requires_cross_border,
        }
    }
}

/// Catalog listing row: the projection plus the pattern source.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureSummary {
    #[serde(flatten)]
    pub service: DetectedService,
    pub pattern: String,
}

impl From<&SignatureEntry> for SignatureSummary {
    fn from(entry: &SignatureEntry) -> Self {
        Self {
            service: DetectedService::from(entry),
            pattern: entry.pattern.as_str().to_string(),
        }
    }
}
