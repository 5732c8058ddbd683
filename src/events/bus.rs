//! # Event bus for one workshop run.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. A fresh bus is created per
//! [`Supervisor::run`](crate::Supervisor::run), shared by the action log, the
//! worker actors and the supervisor itself.
//!
//! ```text
//! ActionLog ──┐
//! Santa     ──┤
//! Elf 1..N  ──┼──► Bus ──► subscriber_listener ──► SubscriberSet
//! RD 1..M   ──┤             (in Supervisor)
//! Supervisor──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receiver the event is dropped.
//! - One ring buffer for all receivers; a receiver that falls behind by more
//!   than the capacity observes `RecvError::Lagged(n)` and skips `n` events.
//! - Publishing is never on the protocol's critical path: a full buffer cannot
//!   stall a worker.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to every live receiver.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
