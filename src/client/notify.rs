//! Process-wide broadcast of settled detections.

use tokio::sync::broadcast;

use crate::config::NOTIFICATION_CHANNEL_CAPACITY;
use crate::detection::{DetectionMode, ParserResult};

/// A detection that a subscription settled with fresh data
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    pub mode: DetectionMode,
    pub result: ParserResult,
}

/// Fan-out channel for [`DetectionEvent`]s.
///
/// Clones share one channel. Slow receivers lag and lose the oldest events.
#[derive(Debug, Clone)]
pub struct DetectionNotifier {
    sender: broadcast::Sender<DetectionEvent>,
}

impl Default for DetectionNotifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_CHANNEL_CAPACITY)
    }
}

impl DetectionNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DetectionEvent> {
        self.sender.subscribe()
    }

    /// Sends `event` to current receivers. Having none is not an error.
    pub fn publish(&self, event: DetectionEvent) {
        let _ = self.sender.send(event);
    }
}
