//! # Launching workers onto independent execution contexts.
//!
//! The [`Supervisor`](crate::Supervisor) never spawns directly; it hands each
//! boxed worker future to a [`Launch`] implementation. A launcher may refuse,
//! which is fatal for the run: the supervisor then tears down every worker
//! already started.
//!
//! [`TokioLauncher`] (the default) spawns onto the ambient tokio runtime and
//! refuses when there is none.

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::task::{Id, JoinSet};

use crate::error::RuntimeError;
use crate::events::WorkerId;

/// A worker ready to run.
pub type WorkerFuture = BoxFuture<'static, ()>;

/// Starts worker futures; the primitive "start a new concurrent worker".
pub trait Launch: Send + Sync + 'static {
    /// Starts `fut` inside `set` and returns its task id.
    fn launch(
        &self,
        set: &mut JoinSet<()>,
        worker: WorkerId,
        fut: WorkerFuture,
    ) -> Result<Id, RuntimeError>;
}

/// Spawns onto the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioLauncher;

impl Launch for TokioLauncher {
    fn launch(
        &self,
        set: &mut JoinSet<()>,
        worker: WorkerId,
        fut: WorkerFuture,
    ) -> Result<Id, RuntimeError> {
        let handle = Handle::try_current().map_err(|e| RuntimeError::Launch {
            worker: worker.to_string(),
            reason: e.to_string(),
        })?;
        Ok(set.spawn_on(fut, &handle).id())
    }
}
