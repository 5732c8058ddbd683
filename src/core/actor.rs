//! # WorkerActor: the one loop every role runs in.
//!
//! ```text
//! Supervisor ──► WorkerActor::run(token)
//!
//! publish WorkerStarting
//! state = role.start()
//! loop {
//!   ├─► select {
//!   │     token.cancelled()        → publish WorkerAborted("cancelled"), exit
//!   │     role.step(state, &ws)    → Next(s) ─► state = s, continue
//!   │                              → Done    ─► break
//!   │                              → Err     ─► publish WorkerAborted("signal_closed"), exit
//!   │   }
//! }
//! publish WorkerFinished
//! ws.mark_ended()   (last worker releases the completion barrier)
//! ```
//!
//! ## Rules
//! - Completion is reported **exactly once**, and only after `Done`.
//! - An aborted worker never reports completion.
//! - Cancellation is observed between and inside steps (any wait is cancellable).

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{
    events::{Bus, Event, EventKind},
    roles::{Role, Step},
    workshop::Workshop,
};

/// Drives one [`Role`] over a shared [`Workshop`].
pub struct WorkerActor<R: Role> {
    /// Role state machine.
    pub role: R,
    /// Shared state of the run.
    pub ws: Arc<Workshop>,
    /// Event bus of the run.
    pub bus: Bus,
}

impl<R: Role> WorkerActor<R> {
    /// Creates a new actor.
    pub fn new(role: R, ws: Arc<Workshop>, bus: Bus) -> Self {
        Self { role, ws, bus }
    }

    /// Runs the role until its terminal state, cancellation, or teardown.
    pub async fn run(self, token: CancellationToken) {
        let id = self.role.id();
        self.bus
            .publish(Event::new(EventKind::WorkerStarting).with_worker(id));

        let mut state = self.role.start();
        loop {
            let step = select! {
                biased;
                _ = token.cancelled() => {
                    self.aborted("cancelled");
                    return;
                }
                res = self.role.step(state, &self.ws) => res,
            };

            match step {
                Ok(Step::Next(next)) => state = next,
                Ok(Step::Done) => break,
                Err(_closed) => {
                    self.aborted("signal_closed");
                    return;
                }
            }
        }

        self.bus
            .publish(Event::new(EventKind::WorkerFinished).with_worker(id));
        self.ws.mark_ended().await;
    }

    fn aborted(&self, reason: &'static str) {
        self.bus.publish(
            Event::new(EventKind::WorkerAborted)
                .with_worker(self.role.id())
                .with_reason(reason),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::policies::Pace;
    use crate::roles::{Reindeer, Santa};
    use crate::workshop::MemorySink;

    fn workshop(elves: u64, reindeer: u64) -> (Arc<Workshop>, MemorySink, Bus) {
        let sink = MemorySink::new();
        let bus = Bus::new(64);
        let cfg = Config::new(elves, reindeer, 0, 0).unwrap();
        let ws = Workshop::new(cfg, Box::new(sink.clone()), bus.clone());
        (Arc::new(ws), sink, bus)
    }

    #[tokio::test]
    async fn finished_worker_reports_completion_once() {
        let (ws, sink, bus) = workshop(1, 1);
        ws.signals().reindeer_release.release(1);
        let mut rx = bus.subscribe();

        let actor = WorkerActor::new(Reindeer::new(1, Arc::new(Pace::exact())), ws.clone(), bus);
        actor.run(CancellationToken::new()).await;

        assert_eq!(ws.counters().await.ended, 1);
        assert_eq!(
            sink.lines(),
            vec!["1: RD 1: rstarted", "2: RD 1: return home", "3: RD 1: get hitched"]
        );

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::WorkerStarting));
        assert_eq!(kinds.last(), Some(&EventKind::WorkerFinished));
    }

    #[tokio::test]
    async fn cancelled_worker_does_not_report_completion() {
        let (ws, _, bus) = workshop(1, 1);
        let token = CancellationToken::new();
        let mut rx = bus.subscribe();

        let actor = WorkerActor::new(Santa, ws.clone(), bus);
        let handle = tokio::spawn(actor.run(token.clone()));
        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(ws.counters().await.ended, 0);

        let mut aborted = None;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::WorkerAborted {
                aborted = Some(ev);
            }
        }
        let aborted = aborted.expect("aborted event");
        assert_eq!(aborted.worker.as_deref(), Some("Santa"));
        assert_eq!(aborted.reason.as_deref(), Some("cancelled"));
    }

    #[tokio::test]
    async fn teardown_aborts_waiting_worker() {
        let (ws, _, bus) = workshop(1, 1);
        ws.teardown();

        WorkerActor::new(Santa, ws.clone(), bus).run(CancellationToken::new()).await;

        assert_eq!(ws.counters().await.ended, 0);
        assert_eq!(ws.counters().await.actions, 1);
    }
}
