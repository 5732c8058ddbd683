//! # Workshop: the shared state of one run.
//!
//! [`Workshop`] owns every counter the protocol needs and the signals workers
//! rendezvous on. Workers never see a counter directly; they call the guarded
//! operations below, each of which takes exactly one counter lock for a few
//! instructions and never waits on a signal while holding it.
//!
//! ## Locks
//! ```text
//! desk             ─ elves_waiting + workshop_open
//! reindeer_home    ─ reindeer back from holiday
//! reindeer_hitched ─ reindeer attached to the sleigh
//! ended            ─ workers that reached their terminal state
//! ActionLog        ─ sequence number + sink (leaf lock)
//! ```
//! Counter locks are never nested with each other. The desk lock is the only
//! one held while logging (the action log lock is a leaf), so that
//! "Santa: closing workshop" and every "Elf i: get help" are ordered by the
//! same critical section that flips or reads `workshop_open`.
//!
//! ## Signals
//! ```text
//! wake_santa        0 ─ one token per elf batch, one from the last reindeer home
//! workshop_slot     1 ─ at most one elf batch in flight toward Santa
//! elf_release       0 ─ 3 per help round, or one per waiting elf at closure
//!                       (handed out via release_elves, taken via claim_release)
//! reindeer_release  0 ─ reindeer_count tokens once Santa hitches
//! all_hitched       0 ─ one token from the last hitched reindeer
//! completion        0 ─ one token from the last worker to end
//! ```

mod action_log;
mod signal;
mod sink;

use std::io;

use tokio::sync::Mutex;

use crate::core::Config;
use crate::error::SignalClosed;
use crate::events::{Action, Bus, Event, EventKind, WorkerId};

pub use action_log::{ActionLog, LogSink};
pub use signal::Signal;
pub use sink::MemorySink;

/// Elves per help round.
pub const BATCH: usize = 3;

/// Rendezvous signals of one run.
#[derive(Debug)]
pub struct Signals {
    pub wake_santa: Signal,
    pub workshop_slot: Signal,
    pub elf_release: Signal,
    pub reindeer_release: Signal,
    pub all_hitched: Signal,
    pub completion: Signal,
}

impl Signals {
    fn new() -> Self {
        Self {
            wake_santa: Signal::new("wake_santa", 0),
            workshop_slot: Signal::new("workshop_slot", 1),
            elf_release: Signal::new("elf_release", 0),
            reindeer_release: Signal::new("reindeer_release", 0),
            all_hitched: Signal::new("all_hitched", 0),
            completion: Signal::new("completion", 0),
        }
    }

    fn all(&self) -> [&Signal; 6] {
        [
            &self.wake_santa,
            &self.workshop_slot,
            &self.elf_release,
            &self.reindeer_release,
            &self.all_hitched,
            &self.completion,
        ]
    }
}

/// Elf-facing part of the workshop.
#[derive(Debug)]
struct Desk {
    waiting: usize,
    open: bool,
}

/// Outcome of an elf asking for help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpRequest {
    /// The workshop is closed; the elf goes on holiday.
    Closed,
    /// The elf was counted; `waiting` includes it.
    Queued { waiting: usize },
}

/// Point-in-time copy of every counter (each read under its own lock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub actions: u64,
    pub ended: usize,
    pub reindeer_home: u16,
    pub reindeer_hitched: u16,
    pub elves_waiting: usize,
    pub workshop_open: bool,
}

/// Shared state of one workshop run.
pub struct Workshop {
    config: Config,
    log: ActionLog,
    bus: Bus,
    desk: Mutex<Desk>,
    reindeer_home: Mutex<u16>,
    reindeer_hitched: Mutex<u16>,
    ended: Mutex<usize>,
    signals: Signals,
}

impl Workshop {
    /// Creates the state for one run; the workshop starts open.
    pub fn new(config: Config, sink: LogSink, bus: Bus) -> Self {
        Self {
            config,
            log: ActionLog::new(sink, bus.clone()),
            bus,
            desk: Mutex::new(Desk {
                waiting: 0,
                open: true,
            }),
            reindeer_home: Mutex::new(0),
            reindeer_hitched: Mutex::new(0),
            ended: Mutex::new(0),
            signals: Signals::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Appends one action to the log.
    pub async fn log(&self, action: Action) -> u64 {
        self.log.log(action).await
    }

    // === Elves ===

    /// Counts the elf as waiting unless the workshop is closed.
    pub async fn request_help(&self) -> HelpRequest {
        let mut desk = self.desk.lock().await;
        if !desk.open {
            return HelpRequest::Closed;
        }
        desk.waiting += 1;
        // Up to one released batch can queue again before Santa subtracts it.
        debug_assert!(desk.waiting <= self.config.elves() as usize + BATCH);
        HelpRequest::Queued {
            waiting: desk.waiting,
        }
    }

    /// Whether a full batch is still waiting in an open workshop.
    ///
    /// Checked by the elf holding `workshop_slot` right before waking Santa.
    pub async fn batch_ready(&self) -> bool {
        let desk = self.desk.lock().await;
        desk.open && desk.waiting >= BATCH
    }

    /// Takes one `elf_release` token and announces the claim.
    pub async fn claim_release(&self, elf: u16) -> Result<(), SignalClosed> {
        self.signals.elf_release.wait().await?;
        self.bus
            .publish(Event::new(EventKind::ElfReleased).with_worker(WorkerId::Elf(elf)));
        Ok(())
    }

    /// Post-release check: logs "get help" and returns `true` while the
    /// workshop is open; returns `false` once it has closed.
    pub async fn resume_after_help(&self, elf: u16) -> bool {
        let desk = self.desk.lock().await;
        if desk.open {
            self.log.log(Action::ElfGetHelp(elf)).await;
        }
        desk.open
    }

    // === Santa ===

    /// Whether every reindeer is back from holiday.
    pub async fn reindeer_all_home(&self) -> bool {
        *self.reindeer_home.lock().await == self.config.reindeer()
    }

    /// Hands out `n` elf release tokens. The hand-out is published first,
    /// so it precedes every claim it covers on the bus.
    pub fn release_elves(&self, n: usize, cause: &'static str) {
        self.bus.publish(Event::elves_released(n, cause));
        self.signals.elf_release.release(n);
    }

    /// Removes one served batch from the waiting count.
    pub async fn serve_batch(&self) {
        let mut desk = self.desk.lock().await;
        debug_assert!(desk.waiting >= BATCH, "served a partial batch");
        desk.waiting = desk.waiting.saturating_sub(BATCH);
    }

    /// Logs "closing workshop", closes the workshop for good and drains the
    /// waiting count; returns how many elves were still waiting.
    pub async fn close_workshop(&self) -> usize {
        let mut desk = self.desk.lock().await;
        debug_assert!(desk.open, "workshop closed twice");
        self.log.log(Action::SantaClosing).await;
        desk.open = false;
        std::mem::take(&mut desk.waiting)
    }

    // === Reindeer ===

    /// Counts one reindeer home; `true` for the last one.
    pub async fn return_home(&self) -> bool {
        let mut home = self.reindeer_home.lock().await;
        *home += 1;
        debug_assert!(*home <= self.config.reindeer());
        *home == self.config.reindeer()
    }

    /// Counts one reindeer hitched; `true` for the last one.
    pub async fn hitch(&self) -> bool {
        let mut hitched = self.reindeer_hitched.lock().await;
        *hitched += 1;
        debug_assert!(*hitched <= self.config.reindeer());
        *hitched == self.config.reindeer()
    }

    // === Completion ===

    /// Records one worker as ended; the last one releases the completion barrier.
    pub async fn mark_ended(&self) -> bool {
        let mut ended = self.ended.lock().await;
        *ended += 1;
        debug_assert!(*ended <= self.config.total_workers());
        let last = *ended == self.config.total_workers();
        if last {
            self.signals.completion.release(1);
        }
        last
    }

    /// Blocks until every worker has ended.
    pub async fn wait_completion(&self) -> Result<(), SignalClosed> {
        self.signals.completion.wait().await
    }

    /// Closes every signal; any worker still waiting fails with [`SignalClosed`].
    pub fn teardown(&self) {
        for signal in self.signals.all() {
            signal.close();
        }
    }

    /// Flushes and closes the action log; see [`ActionLog::close`].
    pub async fn close_log(&self) -> io::Result<()> {
        self.log.close().await
    }

    /// Reads every counter (not atomically across counters).
    pub async fn counters(&self) -> Counters {
        let (elves_waiting, workshop_open) = {
            let desk = self.desk.lock().await;
            (desk.waiting, desk.open)
        };
        Counters {
            actions: self.log.count().await,
            ended: *self.ended.lock().await,
            reindeer_home: *self.reindeer_home.lock().await,
            reindeer_hitched: *self.reindeer_hitched.lock().await,
            elves_waiting,
            workshop_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workshop(elves: u64, reindeer: u64) -> (Workshop, MemorySink) {
        let sink = MemorySink::new();
        let cfg = Config::new(elves, reindeer, 0, 0).unwrap();
        (Workshop::new(cfg, Box::new(sink.clone()), Bus::new(64)), sink)
    }

    #[tokio::test]
    async fn requests_are_counted_until_closure() {
        let (ws, _) = workshop(5, 1);
        assert_eq!(ws.request_help().await, HelpRequest::Queued { waiting: 1 });
        assert_eq!(ws.request_help().await, HelpRequest::Queued { waiting: 2 });
        assert!(!ws.batch_ready().await);
        assert_eq!(ws.request_help().await, HelpRequest::Queued { waiting: 3 });
        assert!(ws.batch_ready().await);

        assert_eq!(ws.close_workshop().await, 3);
        assert_eq!(ws.request_help().await, HelpRequest::Closed);
        assert!(!ws.batch_ready().await);

        let c = ws.counters().await;
        assert_eq!(c.elves_waiting, 0);
        assert!(!c.workshop_open);
    }

    #[tokio::test]
    async fn serving_a_batch_removes_exactly_three() {
        let (ws, _) = workshop(5, 1);
        for _ in 0..4 {
            ws.request_help().await;
        }
        ws.serve_batch().await;
        assert_eq!(ws.counters().await.elves_waiting, 1);
    }

    #[tokio::test]
    async fn released_batch_may_queue_again_before_it_is_served() {
        let (ws, _) = workshop(3, 1);
        for _ in 0..3 {
            ws.request_help().await;
        }
        ws.release_elves(BATCH, "help_round");
        for id in 1..=3 {
            ws.claim_release(id).await.unwrap();
        }
        for _ in 0..3 {
            ws.request_help().await;
        }
        assert_eq!(ws.counters().await.elves_waiting, 2 * BATCH);

        ws.serve_batch().await;
        assert_eq!(ws.counters().await.elves_waiting, BATCH);
    }

    #[tokio::test]
    async fn hand_out_precedes_claims_on_the_bus() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let cfg = Config::new(3, 1, 0, 0).unwrap();
        let ws = Workshop::new(cfg, Box::new(MemorySink::new()), bus);

        ws.release_elves(2, "closure");
        ws.claim_release(1).await.unwrap();
        ws.claim_release(2).await.unwrap();
        assert_eq!(ws.signals().elf_release.available(), 0);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::ElvesReleased);
        assert_eq!(first.count, Some(2));
        for id in 1..=2 {
            let ev = rx.recv().await.unwrap();
            assert_eq!(ev.kind, EventKind::ElfReleased);
            assert_eq!(ev.worker.as_deref(), Some(format!("Elf {id}").as_str()));
        }
    }

    #[tokio::test]
    async fn get_help_is_logged_only_while_open() {
        let (ws, sink) = workshop(3, 1);
        assert!(ws.resume_after_help(2).await);
        ws.close_workshop().await;
        assert!(!ws.resume_after_help(2).await);

        assert_eq!(
            sink.lines(),
            vec!["1: Elf 2: get help", "2: Santa: closing workshop"]
        );
    }

    #[tokio::test]
    async fn last_reindeer_is_reported_once() {
        let (ws, _) = workshop(1, 3);
        assert!(!ws.return_home().await);
        assert!(!ws.reindeer_all_home().await);
        assert!(!ws.return_home().await);
        assert!(ws.return_home().await);
        assert!(ws.reindeer_all_home().await);

        assert!(!ws.hitch().await);
        assert!(!ws.hitch().await);
        assert!(ws.hitch().await);
    }

    #[tokio::test]
    async fn completion_released_by_last_worker_only() {
        let (ws, _) = workshop(1, 1);
        assert!(!ws.mark_ended().await);
        assert!(!ws.mark_ended().await);
        assert_eq!(ws.signals().completion.available(), 0);
        assert!(ws.mark_ended().await);
        assert_eq!(ws.signals().completion.available(), 1);
        ws.wait_completion().await.unwrap();
    }

    #[tokio::test]
    async fn teardown_fails_pending_waits() {
        let (ws, _) = workshop(1, 1);
        ws.teardown();
        assert_eq!(ws.signals().elf_release.wait().await, Err(SignalClosed));
        assert_eq!(ws.wait_completion().await, Err(SignalClosed));
    }
}
