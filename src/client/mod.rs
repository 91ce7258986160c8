//! Client-side consumption of the detection endpoint.
//!
//! This module provides:
//! - `ParserSubscription`: debounced, generation-guarded detection for a changing input
//! - `ResultCache` / `ParserCache`: 24h result cache over a `KeyValueStore`
//! - `ParserApi` / `HttpParserApi`: transport to the endpoint
//! - `DetectionNotifier`: broadcast of freshly settled results
//!
//! All collaborators are injected so the same logic runs headless and in tests.

mod api;
mod cache;
mod notify;
mod store;
mod subscription;

// Re-export public API
pub use api::{HttpParserApi, ParserApi};
pub use cache::{CacheEntry, ParserCache, ResultCache};
pub use notify::{DetectionEvent, DetectionNotifier};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use subscription::{cache_key, ParserSubscription, SubscriptionSnapshot, SubscriptionState};
