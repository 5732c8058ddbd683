//! # LogWriter: diagnostic event printer
//!
//! Prints incoming [`Event`]s to **stderr**, so the action log itself can be
//! sent to stdout (`-o -`) without the two interleaving.
//!
//! ## Example output
//! ```text
//! [action] line=4 worker="Elf 2" action=elf_need_help
//! [released] worker="Santa" count=3 cause="help_round"
//! [claimed] worker="Elf 2"
//! [starting] worker="RD 1"
//! [finished] worker="RD 1"
//! [aborted] worker="Elf 3" reason="cancelled"
//! [launch-failed] worker="Elf 7" reason="no runtime"
//! [shutdown-requested]
//! [all-finished]
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(e: &Event) -> String {
        let worker = e.worker.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::ActionLogged => format!(
                "[action] line={} worker={worker:?} action={}",
                e.line.unwrap_or_default(),
                e.action.map_or("unknown", |a| a.as_label()),
            ),
            EventKind::ElvesReleased => format!(
                "[released] worker={worker:?} count={} cause={reason:?}",
                e.count.unwrap_or_default(),
            ),
            EventKind::ElfReleased => format!("[claimed] worker={worker:?}"),
            EventKind::WorkerStarting => format!("[starting] worker={worker:?}"),
            EventKind::WorkerFinished => format!("[finished] worker={worker:?}"),
            EventKind::WorkerAborted => format!("[aborted] worker={worker:?} reason={reason:?}"),
            EventKind::LaunchFailed => {
                format!("[launch-failed] worker={worker:?} reason={reason:?}")
            }
            EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
            EventKind::AllFinished => "[all-finished]".to_string(),
            EventKind::SubscriberOverflow => {
                format!("[subscriber-overflow] subscriber={worker:?} reason={reason:?}")
            }
            EventKind::SubscriberPanicked => {
                format!("[subscriber-panicked] subscriber={worker} info={reason}")
            }
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        eprintln!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
