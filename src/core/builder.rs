use std::sync::Arc;

use super::{
    config::SupervisorConfig,
    launch::{Launch, TokioLauncher},
    supervisor::Supervisor,
};
use crate::policies::{DurationSource, Pace};
use crate::subscribers::Subscribe;

/// Builder for constructing a [`Supervisor`] with optional collaborators.
///
/// Defaults: no subscribers, [`TokioLauncher`], [`Pace::random`].
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    launcher: Arc<dyn Launch>,
    pace: Arc<dyn DurationSource>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            launcher: Arc::new(TokioLauncher),
            pace: Arc::new(Pace::random()),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (actions, worker lifecycle, etc.)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the primitive used to start workers.
    pub fn with_launcher(mut self, launcher: Arc<dyn Launch>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Replaces the source of work and holiday durations.
    pub fn with_pace(mut self, pace: Arc<dyn DurationSource>) -> Self {
        self.pace = pace;
        self
    }

    /// Builds and returns the Supervisor instance.
    pub fn build(self) -> Supervisor {
        Supervisor::new_internal(self.cfg, self.subscribers, self.launcher, self.pace)
    }
}
