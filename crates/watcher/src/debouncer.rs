//! Notification debouncing
//!
//! The gate accepts a notification only when at least the debounce window
//! has elapsed since the previously accepted one. Suppressed notifications
//! do not extend the window.

use crate::events::FileChange;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Single-slot gate keyed on the last accepted notification time
#[derive(Debug)]
pub struct DebounceGate {
    /// Minimum distance between two accepted notifications
    window: Duration,
    /// When the last notification was accepted
    last_accepted: Mutex<Option<Instant>>,
    accepted: AtomicU64,
    suppressed: AtomicU64,
}

impl DebounceGate {
    /// Create a new gate with the given window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: Mutex::new(None),
            accepted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Decide whether a notification arriving now should trigger detection
    pub fn try_accept(&self) -> bool {
        self.try_accept_at(Instant::now())
    }

    /// Decide whether a notification arriving at `now` should trigger detection
    pub fn try_accept_at(&self, now: Instant) -> bool {
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            if now.saturating_duration_since(previous) < self.window {
                self.suppressed.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        }

        *last = Some(now);
        self.accepted.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// The configured debounce window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of accepted notifications so far
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Number of suppressed notifications so far
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }
}

/// Forwards accepted notifications to the detection queue
pub struct EventDebouncer {
    gate: Arc<DebounceGate>,
    /// Channel to send accepted events
    output_tx: mpsc::Sender<FileChange>,
}

impl EventDebouncer {
    /// Create a new event debouncer
    pub fn new(debounce_duration: Duration, output_tx: mpsc::Sender<FileChange>) -> Self {
        Self {
            gate: Arc::new(DebounceGate::new(debounce_duration)),
            output_tx,
        }
    }

    /// Process an incoming event, returning whether it was forwarded
    ///
    /// An accepted event waits for room in the detection queue, so every
    /// accepted notification reaches exactly one detection pass.
    pub async fn process_event(&self, event: FileChange) -> bool {
        if !self.gate.try_accept() {
            trace!(
                "Suppressed notification for {:?} within {:?} of last accepted",
                event.path(),
                self.gate.window()
            );
            return false;
        }

        debug!("Accepted notification for {:?} ({:?})", event.path(), event.kind);
        if let Err(e) = self.output_tx.send(event).await {
            warn!("Detection queue closed, dropping notification: {}", e);
            return false;
        }
        true
    }

    /// Shared handle to the gate, for counters
    pub fn gate(&self) -> Arc<DebounceGate> {
        Arc::clone(&self.gate)
    }
}
