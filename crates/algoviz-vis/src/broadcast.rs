//! Rendering port that fans frames out to every connected client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use algoviz_core::{Frame, RenderPort};
use tokio::sync::broadcast;

/// Frames buffered per subscriber before it starts lagging.
pub const FRAME_BUFFER: usize = 1024;

/// Broadcasts every emitted frame and remembers the latest one for clients
/// that connect mid-run.
#[derive(Debug)]
pub struct BroadcastPort {
    sender: broadcast::Sender<Frame>,
    latest: Mutex<Option<Frame>>,
    sent: AtomicU64,
}

impl Default for BroadcastPort {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPort {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FRAME_BUFFER);
        Self {
            sender,
            latest: Mutex::new(None),
            sent: AtomicU64::new(0),
        }
    }

    /// Receive every frame emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }

    /// The most recent frame, if any.
    pub fn latest(&self) -> Option<Frame> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Frames emitted so far.
    pub fn frame_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl RenderPort for BroadcastPort {
    fn emit(&self, frame: Frame) {
        *self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(frame.clone());
        self.sent.fetch_add(1, Ordering::Relaxed);
        // No subscribers is fine; the latest frame is still kept.
        let _ = self.sender.send(frame);
    }
}
