//! # Event subscribers for the workshop runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and two built-in subscribers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   WorkerActor / ActionLog ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                                          │
//!                                                              ┌───────────┼──────────┐
//!                                                              ▼           ▼          ▼
//!                                                          LogWriter     Tally     Custom
//! ```
//!
//! - [`LogWriter`]: prints every event to stderr (`--verbose`)
//! - [`Tally`]: counts actions and worker outcomes (`--summary`, tests)

mod log;
mod subscribe;
mod subscriber_set;
mod tally;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
pub use tally::Tally;
