//! TTL cache of detection results.
//!
//! `ParserCache` keeps the whole `key -> CacheEntry` map as one JSON document under
//! `CACHE_STORAGE_KEY` in a `KeyValueStore`. Expired entries are dropped whenever
//! the map is read; there is no background sweep.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::clock::Clock;
use crate::config::{CACHE_STORAGE_KEY, CACHE_TTL};
use crate::detection::ParserResult;

/// Cache of detection results keyed by normalized URL.
///
/// Failures never reach the caller: a broken cache behaves like an empty one.
pub trait ResultCache: Send + Sync {
    /// Returns the live entry for `key`, if any.
    fn get(&self, key: &str) -> Option<ParserResult>;
    /// Stores `result` under `key`. Results with no detected services are ignored.
    fn set(&self, key: &str, result: &ParserResult);
    fn evict(&self, key: &str);
}

/// A cached result and the epoch millisecond it was stored at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: ParserResult,
    pub timestamp: i64,
}

type CacheMap = BTreeMap<String, CacheEntry>;

/// `ResultCache` over a `KeyValueStore`.
pub struct ParserCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    // Serializes read-modify-write cycles on the stored map
    lock: Mutex<()>,
}

impl ParserCache {
    /// Cache with the default 24h lifetime.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(store, clock, CACHE_TTL)
    }

    pub fn with_ttl(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            lock: Mutex::new(()),
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: i64) -> bool {
        now.saturating_sub(entry.timestamp) > self.ttl.as_millis() as i64
    }

    /// Reads the map, dropping expired entries. Returns the map and whether
    /// anything was dropped.
    fn load(&self, now: i64) -> (CacheMap, bool) {
        let raw = match self.store.get_item(CACHE_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (CacheMap::new(), false),
            Err(e) => {
                warn!("Failed to read result cache: {}", e);
                return (CacheMap::new(), false);
            }
        };

        let mut map: CacheMap = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!("Discarding unreadable result cache: {}", e);
                return (CacheMap::new(), true);
            }
        };

        let before = map.len();
        map.retain(|_, entry| !self.is_expired(entry, now));
        let pruned = map.len() != before;
        if pruned {
            debug!("Pruned {} expired cache entries", before - map.len());
        }
        (map, pruned)
    }

    fn persist(&self, map: &CacheMap) {
        let raw = match serde_json::to_string(map) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize result cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set_item(CACHE_STORAGE_KEY, &raw) {
            warn!("Failed to write result cache: {}", e);
        }
    }
}

impl ResultCache for ParserCache {
    fn get(&self, key: &str) -> Option<ParserResult> {
        let _guard = self.lock.lock().ok()?;
        let (map, pruned) = self.load(self.clock.now_epoch_ms());
        if pruned {
            self.persist(&map);
        }
        map.get(key).map(|entry| entry.data.clone())
    }

    fn set(&self, key: &str, result: &ParserResult) {
        if !result.has_detections() {
            debug!("Not caching empty result for {}", key);
            return;
        }
        let Ok(_guard) = self.lock.lock() else {
            warn!("Result cache lock poisoned; skipping write for {}", key);
            return;
        };
        let now = self.clock.now_epoch_ms();
        let (mut map, _) = self.load(now);
        map.insert(
            key.to_string(),
            CacheEntry {
                data: result.clone(),
                timestamp: now,
            },
        );
        self.persist(&map);
    }

    fn evict(&self, key: &str) {
        let Ok(_guard) = self.lock.lock() else {
            return;
        };
        let (mut map, pruned) = self.load(self.clock.now_epoch_ms());
        if map.remove(key).is_some() || pruned {
            self.persist(&map);
        }
    }
}
