//! Runtime events: action vocabulary, event types and broadcast bus.
//!
//! ## Contents
//! - [`Action`], [`WorkerId`] the protocol's log vocabulary
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ActionLog` (one `ActionLogged` per line), `WorkerActor`
//!   (lifecycle), `Supervisor` (launch failures, shutdown, completion),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Supervisor::subscriber_listener()`, which fans out to the
//!   `SubscriberSet`.

mod action;
mod bus;
mod event;

pub use action::{Action, ParseActionError, WorkerId};
pub use bus::Bus;
pub use event::{Event, EventKind};
