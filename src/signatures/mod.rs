//! Signature catalog.
//!
//! A static, data-driven table mapping service identifiers to detection patterns,
//! category and jurisdiction metadata.

mod catalog;
mod models;

pub use catalog::SignatureCatalog;
pub use models::{Category, DetectedService, Jurisdiction, SignatureEntry, SignatureSummary};
