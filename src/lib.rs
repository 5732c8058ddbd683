//! # santa-workshop
//!
//! **santa-workshop** runs the Santa's workshop rendezvous: one coordinator
//! (Santa), a pool of elves and a pool of reindeer, each an independent tokio
//! task, synchronized only through guarded counters and counting signals.
//! The result is a numbered action log in which
//!
//! - Santa helps elves in batches of exactly three,
//! - the workshop closes as soon as every reindeer is home (reindeer win ties),
//! - Christmas starts only after every reindeer is hitched,
//! - the run ends only once every worker has reached its terminal state.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            Config (validated)        LogSink (file, stdout, memory)
//!                   │                            │
//!                   ▼                            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor::run                                                  │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to LogWriter, Tally, custom)           │
//! │  - Workshop (counters + signals + ActionLog)                      │
//! │  - Launch (starts workers), DurationSource (work/holiday times)   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//!  │ WorkerActor │   │ WorkerActor │   │ WorkerActor │
//!  │   <Santa>   │   │   <Elf i>   │   │ <Reindeer j>│
//!  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!         │  guarded ops    │                 │
//!         ▼                 ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ Workshop                                                          │
//! │  desk{waiting, open}  reindeer_home  reindeer_hitched  ended      │
//! │  wake_santa  workshop_slot  elf_release  reindeer_release         │
//! │  all_hitched  completion                                          │
//! │  ActionLog ─► "<n>: <worker>: <action>" ─► sink                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle of one worker
//! ```text
//! WorkerActor::run(token)
//!   ├─► publish WorkerStarting
//!   ├─► loop { role.step(state, &workshop) }   (cancellable between and inside steps)
//!   ├─► publish WorkerFinished
//!   └─► workshop.mark_ended()                  (last one releases `completion`)
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                      |
//! |-------------------|-----------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Start workers, wait for completion, tear down.            | [`Supervisor`], [`RunReport`]           |
//! | **Protocol**      | Shared state and role state machines.                     | [`Workshop`], [`Santa`], [`Elf`], [`Reindeer`] |
//! | **Subscriber API**| Observe actions and worker lifecycle.                     | [`Subscribe`], [`LogWriter`], [`Tally`] |
//! | **Timing**        | Pluggable work/holiday durations.                         | [`DurationSource`], [`Pace`]            |
//! | **Errors**        | Typed errors for configuration and orchestration.         | [`ConfigError`], [`RuntimeError`]       |
//! | **Configuration** | Validated run parameters and runtime settings.            | [`Config`], [`SupervisorConfig`]        |
//!
//! ## Example
//! ```rust
//! use santa_workshop::{Config, MemorySink, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_args(&["5", "3", "10", "20"])?;
//!     let sink = MemorySink::new();
//!
//!     let sup = Supervisor::builder(SupervisorConfig::default()).build();
//!     let report = sup.run(config, Box::new(sink.clone())).await?;
//!
//!     assert_eq!(report.finished, 1 + 5 + 3);
//!     assert!(sink.contents().contains("Santa: Christmas started"));
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod roles;
mod subscribers;
mod workshop;

// ---- Public re-exports ----

pub use crate::core::{
    Config, Launch, RunReport, Supervisor, SupervisorBuilder, SupervisorConfig, TokioLauncher,
    WorkerActor, WorkerFuture,
};
pub use error::{ConfigError, RuntimeError, SignalClosed};
pub use events::{Action, Bus, Event, EventKind, ParseActionError, WorkerId};
pub use policies::{DurationSource, Pace, Spread};
pub use roles::{Elf, ElfState, Reindeer, ReindeerState, Role, Santa, SantaState, Step};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet, Tally};
pub use workshop::{
    ActionLog, BATCH, Counters, HelpRequest, LogSink, MemorySink, Signal, Signals, Workshop,
};
