//! # Worker roles.
//!
//! Each role is a state machine over the shared [`Workshop`]. The loop that
//! drives it (start, step until done, report completion, honor cancellation)
//! is written once in [`WorkerActor`](crate::core::WorkerActor); a role only
//! says what one step does.
//!
//! ```text
//! Santa:    Sleeping → Deciding → HelpingElves → Sleeping …
//!                             └─► Closing → Hitching → Christmas ─► done
//! Elf:      Started → Working → NeedHelp → Waiting → GotHelp → Working …
//!                                  └──────────────┴──► (closed) ─► done
//! Reindeer: Started → OnHoliday → ReturnedHome → WaitingHitch → Hitched ─► done
//! ```

mod elf;
mod reindeer;
mod santa;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SignalClosed;
use crate::events::WorkerId;
use crate::workshop::Workshop;

pub use elf::{Elf, ElfState};
pub use reindeer::{Reindeer, ReindeerState};
pub use santa::{Santa, SantaState};

/// Result of one state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<S> {
    /// Continue in the given state.
    Next(S),
    /// Terminal state reached; the worker reports completion.
    Done,
}

/// A worker's protocol, as a state machine.
///
/// `step` may block on workshop signals; it returns [`SignalClosed`] only when
/// the run is being torn down.
#[async_trait]
pub trait Role: Send + Sync + 'static {
    /// State carried between steps.
    type State: Send + 'static;

    /// Identity used in logs and events.
    fn id(&self) -> WorkerId;

    /// Entry state.
    fn start(&self) -> Self::State;

    /// Performs one transition.
    async fn step(
        &self,
        state: Self::State,
        ws: &Workshop,
    ) -> Result<Step<Self::State>, SignalClosed>;
}

/// Sleeps for `d`; a zero duration does not touch the timer at all.
pub(crate) async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
