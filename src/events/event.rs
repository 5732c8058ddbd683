//! # Runtime events emitted by the supervisor, worker actors and the action log.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Protocol events**: one per action-log line (`ActionLogged`), plus elf
//!   release tokens handed out (`ElvesReleased`) and claimed (`ElfReleased`)
//! - **Worker lifecycle events**: starting, finished, aborted, launch failure
//! - **Run events**: shutdown requested, all finished
//!
//! The [`Event`] struct carries additional metadata such as timestamps, worker
//! name, log line number and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! `ActionLogged` events additionally carry `line`, the number written to the log;
//! they are published while the log lock is held, so their bus order matches line order.
//!
//! ## Example
//! ```rust
//! use santa_workshop::{Action, Event, EventKind, WorkerId};
//!
//! let ev = Event::new(EventKind::ActionLogged)
//!     .with_worker(WorkerId::Elf(2))
//!     .with_line(17)
//!     .with_action(Action::ElfNeedHelp(2));
//!
//! assert_eq!(ev.kind, EventKind::ActionLogged);
//! assert_eq!(ev.worker.as_deref(), Some("Elf 2"));
//! assert_eq!(ev.line, Some(17));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::action::{Action, WorkerId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Protocol events ===
    /// A line was appended to the action log.
    ///
    /// Sets:
    /// - `worker`: acting worker
    /// - `line`: log sequence number (1-based)
    /// - `action`: the logged action
    ActionLogged,

    /// Santa handed out elf release tokens.
    ///
    /// Published before the tokens become available, so every matching
    /// `ElfReleased` follows it on the bus.
    ///
    /// Sets:
    /// - `worker`: "Santa"
    /// - `count`: tokens released (3 per help round, the drained count at closure)
    /// - `reason`: "help_round" or "closure"
    ElvesReleased,

    /// An elf consumed one release token and left its wait.
    ///
    /// Sets:
    /// - `worker`: elf name
    ElfReleased,

    // === Worker lifecycle events ===
    /// Worker actor entered its state machine.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerStarting,

    /// Worker reached its terminal state and is about to report completion.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerFinished,

    /// Worker left its state machine without finishing (cancelled or torn down).
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `reason`: "cancelled" or "signal_closed"
    WorkerAborted,

    /// A worker could not be launched; the run is being torn down.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `reason`: launcher message
    LaunchFailed,

    // === Run events ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// Completion barrier passed; every worker reported termination.
    AllFinished,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker (or subscriber), if applicable.
    pub worker: Option<Arc<str>>,
    /// Action-log line number, for `ActionLogged`.
    pub line: Option<u64>,
    /// The logged action, for `ActionLogged`.
    pub action: Option<Action>,
    /// Token count, for `ElvesReleased`.
    pub count: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            line: None,
            action: None,
            count: None,
            reason: None,
        }
    }

    /// Builds the `ActionLogged` event for one log line.
    pub fn logged(line: u64, action: Action) -> Self {
        Event::new(EventKind::ActionLogged)
            .with_worker(action.worker())
            .with_line(line)
            .with_action(action)
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker.to_string().into());
        self
    }

    /// Builds the `ElvesReleased` event for one hand-out of `count` tokens.
    pub fn elves_released(count: usize, cause: &'static str) -> Self {
        Event::new(EventKind::ElvesReleased)
            .with_worker(WorkerId::Santa)
            .with_count(count as u64)
            .with_reason(cause)
    }

    /// Attaches a free-form name (used for subscribers).
    #[inline]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.worker = Some(name.into());
        self
    }

    /// Attaches the log line number.
    #[inline]
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Attaches the logged action.
    #[inline]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Attaches a token count.
    #[inline]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_name(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates the overflow event reported when the bus listener fell behind
    /// and `skipped` events were lost for every subscriber.
    #[inline]
    pub fn bus_lagged(skipped: u64) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_name("subscriber_listener")
            .with_count(skipped)
            .with_reason(format!("subscriber=subscriber_listener reason=lagged skipped={skipped}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_name(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
