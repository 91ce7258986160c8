//! Debounced, cache-aware detection subscription.
//!
//! A `ParserSubscription` turns a stream of raw inputs (what a user is typing) into
//! at most one detection request per quiet period. Every input and every request
//! bumps a generation counter; a response only touches visible state if its
//! generation is still the latest, so superseded requests are left to finish and
//! then ignored.
//!
//! ```text
//! Idle -> Debouncing -> AwaitingResponse -> Settled
//!            ^  |              |
//!            |  +-> Settled    |   (invalid input or cache hit)
//!            +-----------------+   (new input)
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use strum_macros::{AsRefStr, Display};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::api::ParserApi;
use super::cache::ResultCache;
use super::notify::{DetectionEvent, DetectionNotifier};
use crate::config::DEBOUNCE_DELAY;
use crate::detection::{DetectionMode, ParserResult};
use crate::error_handling::ClientError;
use crate::fetch::normalize_url;

/// Lifecycle of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum SubscriptionState {
    Idle,
    Debouncing,
    AwaitingResponse,
    Settled,
}

/// What observers of a subscription see
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSnapshot {
    pub state: SubscriptionState,
    /// Latest settled result; `None` for invalid input or any failure
    pub data: Option<ParserResult>,
}

impl Default for SubscriptionSnapshot {
    fn default() -> Self {
        Self {
            state: SubscriptionState::Idle,
            data: None,
        }
    }
}

/// Cache key for a normalized URL and mode.
///
/// Results filtered by mode are stored apart from full results.
pub fn cache_key(normalized_url: &str, mode: DetectionMode) -> String {
    match mode {
        DetectionMode::All => normalized_url.to_string(),
        other => format!("{}#{}", normalized_url, other),
    }
}

struct Shared {
    api: Arc<dyn ParserApi>,
    cache: Arc<dyn ResultCache>,
    notifier: DetectionNotifier,
    generation: AtomicU64,
    state: watch::Sender<SubscriptionSnapshot>,
}

impl Shared {
    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Bumps the generation and moves to `state` in one step; a concurrent
    /// `settle` either lands before or is rejected.
    fn advance(&self, state: SubscriptionState, clear_data: bool) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|snapshot| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            snapshot.state = state;
            if clear_data {
                snapshot.data = None;
            }
        });
        generation
    }

    /// Bumps the generation and moves to `state`, but only if `generation` is
    /// still the latest. Returns the new generation.
    fn advance_from(&self, generation: u64, state: SubscriptionState) -> Option<u64> {
        let mut next = None;
        self.state.send_if_modified(|snapshot| {
            if self.current() != generation {
                return false;
            }
            next = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            snapshot.state = state;
            true
        });
        next
    }

    /// Settles with `data` if `generation` is still the latest.
    fn settle(&self, generation: u64, data: Option<ParserResult>) -> bool {
        self.state.send_if_modified(|snapshot| {
            if self.current() != generation {
                return false;
            }
            snapshot.state = SubscriptionState::Settled;
            snapshot.data = data;
            true
        })
    }

    /// Debounce timer expired for the input tagged `generation`.
    fn on_timer(self: &Arc<Self>, generation: u64, raw: &str, mode: DetectionMode) {
        if self.current() != generation {
            return;
        }

        let Some(url) = normalize_url(raw) else {
            debug!("Ignoring invalid input '{}'", raw);
            self.settle(generation, None);
            return;
        };

        let key = cache_key(&url, mode);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            self.settle(generation, Some(cached));
            return;
        }

        let Some(request_generation) =
            self.advance_from(generation, SubscriptionState::AwaitingResponse)
        else {
            return;
        };

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = shared.api.parse_website(&url, mode).await;
            shared.on_response(request_generation, &key, mode, outcome);
        });
    }

    fn on_response(
        &self,
        generation: u64,
        key: &str,
        mode: DetectionMode,
        outcome: Result<ParserResult, ClientError>,
    ) {
        if self.current() != generation {
            debug!("Discarding stale response for {}", key);
            return;
        }

        match outcome {
            Ok(result) => {
                if result.has_detections() {
                    self.cache.set(key, &result);
                }
                if self.settle(generation, Some(result.clone())) {
                    self.notifier.publish(DetectionEvent { mode, result });
                }
            }
            Err(e) => {
                warn!("Detection request for {} failed: {}", key, e);
                self.settle(generation, None);
            }
        }
    }
}

/// One consumer's view of detection for a changing input.
///
/// Must be driven from within a Tokio runtime; `set_input` spawns tasks.
pub struct ParserSubscription {
    shared: Arc<Shared>,
    enabled: AtomicBool,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ParserSubscription {
    /// Creates an enabled subscription with the default debounce delay.
    pub fn new(
        api: Arc<dyn ParserApi>,
        cache: Arc<dyn ResultCache>,
        notifier: DetectionNotifier,
    ) -> Self {
        let (state, _) = watch::channel(SubscriptionSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                api,
                cache,
                notifier,
                generation: AtomicU64::new(0),
                state,
            }),
            enabled: AtomicBool::new(true),
            debounce: DEBOUNCE_DELAY,
            timer: Mutex::new(None),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Receiver of state changes; the current value is available immediately.
    pub fn watch(&self) -> watch::Receiver<SubscriptionSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> SubscriptionSnapshot {
        self.shared.state.borrow().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Records new input and restarts the debounce timer.
    ///
    /// Ignored while the subscription is disabled.
    pub fn set_input(&self, raw: impl Into<String>, mode: DetectionMode) {
        if !self.is_enabled() {
            return;
        }
        let raw = raw.into();
        self.cancel_timer();

        let generation = self
            .shared
            .advance(SubscriptionState::Debouncing, false);
        let shared = Arc::clone(&self.shared);
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.on_timer(generation, &raw, mode);
        });

        if let Ok(mut timer) = self.timer.lock() {
            *timer = Some(handle);
        }
    }

    /// Stops the subscription: drops pending work and clears the data.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.cancel_timer();
        self.shared.advance(SubscriptionState::Idle, true);
    }

    /// Re-arms a disabled subscription. The next `set_input` starts a new cycle.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn cancel_timer(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for ParserSubscription {
    fn drop(&mut self) {
        self.cancel_timer();
        self.shared.advance(SubscriptionState::Idle, true);
    }
}
