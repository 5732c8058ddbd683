//! # Tally: counts what happened during a run
//!
//! Listens to every event and keeps:
//! - one counter per action label (`elf_get_help`, `reindeer_hitched`, ...)
//! - the set of workers that started but neither finished nor aborted
//! - how many workers finished and how many aborted
//! - every elf release hand-out and how many tokens elves claimed
//!
//! ```text
//! on_event(ev):
//!   ├─ ActionLogged   && ev.action => actions[label] += 1
//!   ├─ WorkerStarting && ev.worker => alive.insert(name)
//!   ├─ WorkerFinished && ev.worker => alive.remove(name), finished += 1
//!   ├─ WorkerAborted  && ev.worker => alive.remove(name), aborted  += 1
//!   ├─ ElvesReleased  && ev.count  => releases.push((cause, count))
//!   ├─ ElfReleased                 => claimed += 1 (overdrawn if claimed > released)
//!   ├─ SubscriberOverflow          => dropped += 1
//!   └─ otherwise: ignore
//! ```
//!
//! The binary prints [`Tally::render`] with `--summary`; tests use the getters.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

#[derive(Default)]
struct Counts {
    actions: BTreeMap<&'static str, u64>,
    alive: BTreeSet<String>,
    finished: u64,
    aborted: u64,
    dropped: u64,
    releases: Vec<(String, u64)>,
    released: u64,
    claimed: u64,
    overdrawn: bool,
}

/// Counting subscriber.
pub struct Tally {
    inner: RwLock<Counts>,
    capacity: usize,
}

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Counts::default()),
            capacity: 65_536,
        }
    }

    /// Configure the queue capacity for this subscriber.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Number of logged actions with the given label.
    pub async fn count(&self, label: &str) -> u64 {
        self.inner
            .read()
            .await
            .actions
            .get(label)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of logged actions.
    pub async fn total(&self) -> u64 {
        self.inner.read().await.actions.values().sum()
    }

    pub async fn finished(&self) -> u64 {
        self.inner.read().await.finished
    }

    pub async fn aborted(&self) -> u64 {
        self.inner.read().await.aborted
    }

    /// Overflow reports seen (events some subscriber never got).
    pub async fn dropped(&self) -> u64 {
        self.inner.read().await.dropped
    }

    /// Every release hand-out in bus order, as `(cause, count)`.
    pub async fn releases(&self) -> Vec<(String, u64)> {
        self.inner.read().await.releases.clone()
    }

    /// Release tokens elves consumed.
    pub async fn claimed(&self) -> u64 {
        self.inner.read().await.claimed
    }

    /// Whether a claim was ever seen before the hand-out that covers it.
    pub async fn overdrawn(&self) -> bool {
        self.inner.read().await.overdrawn
    }

    /// Sorted names of workers that started and have not ended yet.
    pub async fn alive(&self) -> Vec<String> {
        self.inner.read().await.alive.iter().cloned().collect()
    }

    /// Multi-line human-readable summary.
    pub async fn render(&self) -> String {
        let g = self.inner.read().await;
        let mut out = String::new();
        for (label, n) in &g.actions {
            out.push_str(&format!("{label:<20}{n}\n"));
        }
        out.push_str(&format!("{:<20}{}\n", "workers_finished", g.finished));
        out.push_str(&format!("{:<20}{}\n", "workers_aborted", g.aborted));
        if g.dropped > 0 {
            out.push_str(&format!("{:<20}{}\n", "events_dropped", g.dropped));
        }
        out
    }

    fn handle_end(c: &mut Counts, name: &str) {
        if !c.alive.remove(name) {
            eprintln!("[santa-workshop] Tally: end without start for '{name}'");
        }
    }
}

#[async_trait]
impl Subscribe for Tally {
    async fn on_event(&self, ev: &Event) {
        let name = ev.worker.as_deref();
        match (ev.kind, name) {
            (EventKind::ActionLogged, _) => {
                if let Some(action) = ev.action {
                    *self
                        .inner
                        .write()
                        .await
                        .actions
                        .entry(action.as_label())
                        .or_default() += 1;
                }
            }
            (EventKind::WorkerStarting, Some(name)) => {
                self.inner.write().await.alive.insert(name.to_owned());
            }
            (EventKind::WorkerFinished, Some(name)) => {
                let mut g = self.inner.write().await;
                Self::handle_end(&mut g, name);
                g.finished += 1;
            }
            (EventKind::WorkerAborted, Some(name)) => {
                let mut g = self.inner.write().await;
                Self::handle_end(&mut g, name);
                g.aborted += 1;
            }
            (EventKind::ElvesReleased, _) => {
                let count = ev.count.unwrap_or_default();
                let cause = ev.reason.as_deref().unwrap_or("unknown").to_owned();
                let mut g = self.inner.write().await;
                g.released += count;
                g.releases.push((cause, count));
            }
            (EventKind::ElfReleased, _) => {
                let mut g = self.inner.write().await;
                g.claimed += 1;
                if g.claimed > g.released {
                    g.overdrawn = true;
                }
            }
            (EventKind::SubscriberOverflow, _) => {
                self.inner.write().await.dropped += 1;
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "Tally"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Action, WorkerId};

    #[tokio::test]
    async fn counts_actions_by_label() {
        let t = Tally::new();
        t.on_event(&Event::logged(1, Action::ElfGetHelp(1))).await;
        t.on_event(&Event::logged(2, Action::ElfGetHelp(2))).await;
        t.on_event(&Event::logged(3, Action::SantaHelping)).await;

        assert_eq!(t.count("elf_get_help").await, 2);
        assert_eq!(t.count("santa_helping").await, 1);
        assert_eq!(t.count("santa_closing").await, 0);
        assert_eq!(t.total().await, 3);
    }

    #[tokio::test]
    async fn tracks_worker_lifecycle() {
        let t = Tally::new();
        for id in [WorkerId::Santa, WorkerId::Elf(1), WorkerId::Reindeer(1)] {
            t.on_event(&Event::new(EventKind::WorkerStarting).with_worker(id))
                .await;
        }
        t.on_event(&Event::new(EventKind::WorkerFinished).with_worker(WorkerId::Santa))
            .await;
        t.on_event(
            &Event::new(EventKind::WorkerAborted)
                .with_worker(WorkerId::Elf(1))
                .with_reason("cancelled"),
        )
        .await;

        assert_eq!(t.finished().await, 1);
        assert_eq!(t.aborted().await, 1);
        assert_eq!(t.alive().await, vec!["RD 1".to_string()]);
    }

    #[tokio::test]
    async fn claims_are_matched_against_hand_outs() {
        let t = Tally::new().with_capacity(16);
        assert_eq!(t.queue_capacity(), 16);

        t.on_event(&Event::elves_released(3, "help_round")).await;
        for id in 1..=3 {
            t.on_event(&Event::new(EventKind::ElfReleased).with_worker(WorkerId::Elf(id)))
                .await;
        }
        t.on_event(&Event::elves_released(0, "closure")).await;

        assert_eq!(
            t.releases().await,
            vec![("help_round".to_string(), 3), ("closure".to_string(), 0)]
        );
        assert_eq!(t.claimed().await, 3);
        assert!(!t.overdrawn().await);
        assert_eq!(t.dropped().await, 0);
    }

    #[tokio::test]
    async fn claim_without_hand_out_is_overdrawn() {
        let t = Tally::new();
        t.on_event(&Event::new(EventKind::ElfReleased).with_worker(WorkerId::Elf(1)))
            .await;
        assert!(t.overdrawn().await);
    }

    #[tokio::test]
    async fn lag_reports_count_as_dropped() {
        let t = Tally::new();
        t.on_event(&Event::bus_lagged(5)).await;
        assert_eq!(t.dropped().await, 1);
        assert!(t.render().await.contains("events_dropped"));
    }

    #[tokio::test]
    async fn render_lists_labels_and_totals() {
        let t = Tally::new();
        t.on_event(&Event::logged(1, Action::ChristmasStarted)).await;
        let out = t.render().await;
        assert!(out.contains("christmas_started"));
        assert!(out.contains("workers_finished"));
        assert!(!out.contains("events_dropped"));
    }
}
