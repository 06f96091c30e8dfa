use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{debug, warn};

use super::constants::HEARTBEAT_JITTER_PERCENT;
use super::payloads::GatewayPayload;

/// Frames queued for the connection's writer.
#[derive(Debug)]
pub enum Outbound {
    Payload(GatewayPayload),
    /// The previous heartbeat was never acknowledged; the connection is a zombie.
    HeartbeatMissed,
}

/// Handle the connection uses to feed sequence numbers and acks to the heartbeat task.
#[derive(Debug, Clone)]
pub struct HeartbeatTracker {
    sequence: Arc<AtomicU64>,
    ack_received: Arc<AtomicBool>,
}

impl HeartbeatTracker {
    fn new() -> Self {
        Self {
            sequence: Arc::new(AtomicU64::new(0)),
            ack_received: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn record_sequence(&self, sequence: u64) {
        self.sequence.store(sequence, Ordering::SeqCst);
    }

    pub fn record_ack(&self) {
        self.ack_received.store(true, Ordering::SeqCst);
    }

    fn current_sequence(&self) -> Option<u64> {
        match self.sequence.load(Ordering::SeqCst) {
            0 => None,
            seq => Some(seq),
        }
    }
}

pub struct HeartbeatManager {
    interval_ms: u64,
    tracker: HeartbeatTracker,
    running: Arc<AtomicBool>,
}

impl HeartbeatManager {
    #[must_use]
    pub fn new(interval_ms: u64, last_sequence: Option<u64>) -> Self {
        let tracker = HeartbeatTracker::new();
        if let Some(seq) = last_sequence {
            tracker.record_sequence(seq);
        }
        Self {
            interval_ms,
            tracker,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn tracker(&self) -> HeartbeatTracker {
        self.tracker.clone()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn start(&self, outbound_tx: mpsc::Sender<Outbound>) -> tokio::task::JoinHandle<()> {
        let interval_ms = self.interval_ms;
        let tracker = self.tracker.clone();
        let running = self.running.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let jitter = (interval_ms as f64 * HEARTBEAT_JITTER_PERCENT) as u64;
            let first_delay = Duration::from_millis(interval_ms - jitter);
            let mut ticker = interval_at(
                Instant::now() + first_delay,
                Duration::from_millis(interval_ms),
            );

            while running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                if !tracker.ack_received.load(Ordering::SeqCst) {
                    warn!("Heartbeat ACK not received, connection may be dead");
                    let _ = outbound_tx.send(Outbound::HeartbeatMissed).await;
                    break;
                }

                let seq = tracker.current_sequence();
                tracker.ack_received.store(false, Ordering::SeqCst);
                if outbound_tx
                    .send(Outbound::Payload(GatewayPayload::heartbeat(seq)))
                    .await
                    .is_err()
                {
                    debug!("Heartbeat channel closed");
                    break;
                }
                debug!(sequence = ?seq, "Sent heartbeat");
            }

            debug!("Heartbeat loop stopped");
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for HeartbeatManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_carries_latest_sequence() {
        let manager = HeartbeatManager::new(1000, Some(3));
        let tracker = manager.tracker();
        let (tx, mut rx) = mpsc::channel(4);
        let _handle = manager.start(tx);

        tracker.record_sequence(7);
        let Some(Outbound::Payload(payload)) = rx.recv().await else {
            panic!("expected heartbeat payload");
        };
        assert_eq!(payload.op, 1);
        assert_eq!(payload.d, serde_json::json!(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_ack_is_reported() {
        let manager = HeartbeatManager::new(1000, None);
        let (tx, mut rx) = mpsc::channel(4);
        let _handle = manager.start(tx);

        assert!(matches!(rx.recv().await, Some(Outbound::Payload(_))));
        assert!(matches!(rx.recv().await, Some(Outbound::HeartbeatMissed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acked_heartbeats_keep_flowing() {
        let manager = HeartbeatManager::new(1000, None);
        let tracker = manager.tracker();
        let (tx, mut rx) = mpsc::channel(4);
        let _handle = manager.start(tx);

        for _ in 0..3 {
            assert!(matches!(rx.recv().await, Some(Outbound::Payload(_))));
            tracker.record_ack();
        }
    }
}
