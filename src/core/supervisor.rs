//! # Supervisor: starts every worker, waits for joint completion, tears down.
//!
//! The [`Supervisor`] owns the runtime settings, the subscribers and the two
//! collaborators the protocol needs from the outside: a [`Launch`] to start
//! workers and a [`DurationSource`] for work and holiday times. Each call to
//! [`Supervisor::run`] builds a fresh [`Bus`] and [`Workshop`], so one
//! supervisor can drive several independent runs.
//!
//! ## High-level architecture
//! ```text
//! run(config, sink):
//!   Bus::new(cap) ─► subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!                    (lagged by n ─► emit SubscriberOverflow "skipped=n")
//!   Workshop::new(config, sink, bus)
//!
//! Spawn workers (in this order):
//!   Santa, RD 1..=M, Elf 1..=N
//!       └──► WorkerActor::new(role, ws, bus).run(token.child_token())
//!            launcher.launch(&mut set, id, fut)   ─ Err → LaunchFailed, teardown
//!
//! Drive:
//!   select {
//!     ws.wait_completion()         → publish AllFinished, Ok
//!     watch_panics(set)            → Err(WorkerPanicked)
//!     shutdown_requested()         → publish ShutdownRequested, Err(Interrupted)
//!   }
//!
//! Teardown (always):
//!   on error: token.cancel() + ws.teardown()   (every wait fails, every worker aborts)
//!   join every worker
//!   ws.teardown(), ws.close_log()
//!   stop listener (after draining) ─► SubscriberSet::shutdown()
//! ```
//!
//! ## Rules
//! - A run that reaches the completion barrier has logged every worker's terminal action.
//! - A failed launch is fatal: workers already started are cancelled and joined; no retry.
//! - The action log is closed exactly once per run, after every worker has stopped.
//! - Subscribers see every event published before the listener is stopped.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use santa_workshop::{Config, MemorySink, Subscribe, Supervisor, SupervisorConfig, Tally};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tally = Arc::new(Tally::new());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
//!     let sup = Supervisor::builder(SupervisorConfig::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let sink = MemorySink::new();
//!     let report = sup.run(Config::new(3, 2, 0, 0)?, Box::new(sink.clone())).await?;
//!
//!     assert_eq!(report.finished, 1 + 3 + 2);
//!     assert_eq!(tally.count("christmas_started").await, 1);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::{Id, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::core::{
    actor::WorkerActor,
    builder::SupervisorBuilder,
    config::{Config, SupervisorConfig},
    launch::{Launch, WorkerFuture},
    shutdown,
};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind, WorkerId};
use crate::policies::DurationSource;
use crate::roles::{Elf, Reindeer, Role, Santa};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::workshop::{LogSink, Workshop};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Lines written to the action log.
    pub actions: u64,
    /// Workers that reached their terminal state.
    pub finished: usize,
}

/// Coordinates workers, event delivery (via [`SubscriberSet`]) and teardown.
pub struct Supervisor {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    launcher: Arc<dyn Launch>,
    pace: Arc<dyn DurationSource>,
}

impl Supervisor {
    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
        launcher: Arc<dyn Launch>,
        pace: Arc<dyn DurationSource>,
    ) -> Self {
        Self {
            cfg,
            subscribers,
            launcher,
            pace,
        }
    }

    /// Creates a builder with the given runtime settings.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    /// Runs one workshop instance to completion.
    ///
    /// Returns once every worker has stopped and the log is closed. The first
    /// failure wins: a launch, panic or interrupt error is returned even if
    /// closing the log failed too.
    pub async fn run(&self, config: Config, sink: LogSink) -> Result<RunReport, RuntimeError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let stop = CancellationToken::new();
        let listener = self.subscriber_listener(&bus, stop.clone());

        let ws = Arc::new(Workshop::new(config, sink, bus.clone()));
        let token = CancellationToken::new();
        let mut set = JoinSet::new();
        let mut names = HashMap::new();

        let outcome = match self.spawn_workers(&mut set, &mut names, &ws, &bus, &token) {
            Ok(()) => self.drive(&mut set, &names, &ws, &bus).await,
            Err(e) => Err(e),
        };
        if outcome.is_err() {
            token.cancel();
            ws.teardown();
        }
        while set.join_next().await.is_some() {}

        ws.teardown();
        let counters = ws.counters().await;
        let closed = ws.close_log().await;

        stop.cancel();
        if let Ok(subs) = listener.await {
            subs.shutdown().await;
        }

        outcome?;
        closed?;
        Ok(RunReport {
            actions: counters.actions,
            finished: counters.ended,
        })
    }

    /// Subscribes to the bus and forwards events to the subscriber set until
    /// `stop` fires and the queue is drained.
    ///
    /// Events the listener skipped after lagging are reported straight to the
    /// subscribers; publishing the report on the lagging bus could lose it too.
    fn subscriber_listener(&self, bus: &Bus, stop: CancellationToken) -> JoinHandle<SubscriberSet> {
        let mut rx = bus.subscribe();
        let subs = SubscriberSet::new(self.subscribers.clone(), bus.clone());
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    ev = rx.recv() => match ev {
                        Ok(ev) => subs.emit(&ev),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            subs.emit(&Event::bus_lagged(skipped));
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => break,
                }
            }
            subs
        })
    }

    /// Launches Santa, then every reindeer, then every elf.
    fn spawn_workers(
        &self,
        set: &mut JoinSet<()>,
        names: &mut HashMap<Id, WorkerId>,
        ws: &Arc<Workshop>,
        bus: &Bus,
        token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        let cfg = *ws.config();

        self.launch(set, names, bus, actor(Santa::new(), ws, bus, token))?;
        for id in 1..=cfg.reindeer() {
            let role = Reindeer::new(id, Arc::clone(&self.pace));
            self.launch(set, names, bus, actor(role, ws, bus, token))?;
        }
        for id in 1..=cfg.elves() {
            let role = Elf::new(id, Arc::clone(&self.pace));
            self.launch(set, names, bus, actor(role, ws, bus, token))?;
        }
        Ok(())
    }

    fn launch(
        &self,
        set: &mut JoinSet<()>,
        names: &mut HashMap<Id, WorkerId>,
        bus: &Bus,
        (worker, fut): (WorkerId, WorkerFuture),
    ) -> Result<(), RuntimeError> {
        match self.launcher.launch(set, worker, fut) {
            Ok(id) => {
                names.insert(id, worker);
                Ok(())
            }
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::LaunchFailed)
                        .with_worker(worker)
                        .with_reason(e.as_message()),
                );
                Err(e)
            }
        }
    }

    /// Waits for the completion barrier, a worker panic, or a termination signal.
    async fn drive(
        &self,
        set: &mut JoinSet<()>,
        names: &HashMap<Id, WorkerId>,
        ws: &Workshop,
        bus: &Bus,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            biased;
            done = ws.wait_completion() => match done {
                Ok(()) => {
                    bus.publish(Event::new(EventKind::AllFinished));
                    Ok(())
                }
                Err(_) => Err(RuntimeError::Interrupted),
            },
            err = watch_panics(set, names) => Err(err),
            _ = shutdown::shutdown_requested(self.cfg.handle_signals) => {
                bus.publish(Event::new(EventKind::ShutdownRequested));
                Err(RuntimeError::Interrupted)
            }
        }
    }
}

fn actor<R: Role>(
    role: R,
    ws: &Arc<Workshop>,
    bus: &Bus,
    token: &CancellationToken,
) -> (WorkerId, WorkerFuture) {
    let id = role.id();
    let fut = WorkerActor::new(role, Arc::clone(ws), bus.clone())
        .run(token.child_token())
        .boxed();
    (id, fut)
}

/// Resolves with the first worker panic; pends forever once every worker has returned.
async fn watch_panics(set: &mut JoinSet<()>, names: &HashMap<Id, WorkerId>) -> RuntimeError {
    while let Some(joined) = set.join_next_with_id().await {
        let Err(e) = joined else { continue };
        if e.is_panic() {
            let worker = names
                .get(&e.id())
                .map_or_else(|| format!("task {}", e.id()), ToString::to_string);
            return RuntimeError::WorkerPanicked { worker };
        }
    }
    std::future::pending().await
}
