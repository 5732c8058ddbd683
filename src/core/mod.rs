//! Runtime core: configuration, orchestration and lifecycle.
//!
//! The public entry point is [`Supervisor`], which starts one Santa, the elves
//! and the reindeer, waits for all of them, and tears the run down.
//!
//! Internal modules:
//! - [`config`]: validated run configuration and supervisor settings;
//! - [`actor`]: the generic worker loop every role runs in;
//! - [`launch`]: the seam through which workers are started;
//! - [`supervisor`]: orchestrates workers, subscribers and teardown;
//! - [`shutdown`]: cross-platform termination signal handling.

mod actor;
mod builder;
mod config;
mod launch;
mod shutdown;
mod supervisor;

pub use actor::WorkerActor;
pub use builder::SupervisorBuilder;
pub use config::{Config, SupervisorConfig};
pub use launch::{Launch, TokioLauncher, WorkerFuture};
pub use supervisor::{RunReport, Supervisor};
