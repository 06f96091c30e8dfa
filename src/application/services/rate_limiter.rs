//! Per-channel cooldown gate.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::ChannelId;

/// Fixed-window limiter keyed by channel.
///
/// Admission marks the channel busy and a background timer clears the mark after
/// the window, whether or not the admitted work has finished.
#[derive(Debug, Clone)]
pub struct ChannelRateLimiter {
    busy: Arc<Mutex<HashSet<ChannelId>>>,
    window: Duration,
}

impl ChannelRateLimiter {
    /// Creates new limiter with the given cooldown window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            busy: Arc::new(Mutex::new(HashSet::new())),
            window,
        }
    }

    /// Returns true and starts the cooldown if the channel is idle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn try_admit(&self, channel: ChannelId) -> bool {
        if !self.busy.lock().insert(channel) {
            debug!(channel_id = %channel, "Channel is cooling down");
            return false;
        }

        let busy = Arc::clone(&self.busy);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            busy.lock().remove(&channel);
        });
        true
    }

    /// Returns whether the channel is currently cooling down.
    #[must_use]
    pub fn is_busy(&self, channel: ChannelId) -> bool {
        self.busy.lock().contains(&channel)
    }
}
