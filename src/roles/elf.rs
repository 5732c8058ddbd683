//! # Elf.
//!
//! Works, needs help, queues for Santa in batches of three, and repeats until
//! the workshop closes. After every release the elf re-checks the workshop:
//! an elf released by the closure drain (or released by a help round but
//! resumed only after closure) takes holidays instead of getting help.
//!
//! ## Batch gate
//! ```text
//! request_help ─► waiting >= 3 ? ─► acquire workshop_slot
//!                                       ├─ batch_ready  ─► wake_santa (slot kept until Santa is done)
//!                                       └─ otherwise    ─► give slot back
//! ```
//! The re-check after acquiring the slot matters when more than three elves
//! queue at once: the round that served the first three may already have
//! taken this elf's batch below three.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Role, Step, pause};
use crate::error::SignalClosed;
use crate::events::{Action, WorkerId};
use crate::policies::DurationSource;
use crate::workshop::{BATCH, HelpRequest, Workshop};

/// Elf states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfState {
    Started,
    Working,
    NeedHelp,
    WaitingForHelp,
    GotHelp,
    TakingHolidays,
}

/// One elf.
pub struct Elf {
    id: u16,
    pace: Arc<dyn DurationSource>,
}

impl Elf {
    /// Creates elf `id` (1-based) drawing work durations from `pace`.
    pub fn new(id: u16, pace: Arc<dyn DurationSource>) -> Self {
        Self { id, pace }
    }

    async fn queue_for_help(&self, waiting: usize, ws: &Workshop) -> Result<(), SignalClosed> {
        if waiting < BATCH {
            return Ok(());
        }
        let signals = ws.signals();
        signals.workshop_slot.wait().await?;
        if ws.batch_ready().await {
            signals.wake_santa.release(1);
        } else {
            signals.workshop_slot.release(1);
        }
        Ok(())
    }
}

#[async_trait]
impl Role for Elf {
    type State = ElfState;

    fn id(&self) -> WorkerId {
        WorkerId::Elf(self.id)
    }

    fn start(&self) -> ElfState {
        ElfState::Started
    }

    async fn step(&self, state: ElfState, ws: &Workshop) -> Result<Step<ElfState>, SignalClosed> {
        let next = match state {
            ElfState::Started => {
                ws.log(Action::ElfStarted(self.id)).await;
                ElfState::Working
            }
            ElfState::Working => {
                let work = self.pace.elf_work(self.id, ws.config().elf_work());
                pause(work).await;
                ws.log(Action::ElfNeedHelp(self.id)).await;
                ElfState::NeedHelp
            }
            ElfState::NeedHelp => match ws.request_help().await {
                HelpRequest::Closed => ElfState::TakingHolidays,
                HelpRequest::Queued { waiting } => {
                    self.queue_for_help(waiting, ws).await?;
                    ElfState::WaitingForHelp
                }
            },
            ElfState::WaitingForHelp => {
                ws.claim_release(self.id).await?;
                ElfState::GotHelp
            }
            ElfState::GotHelp => {
                if ws.resume_after_help(self.id).await {
                    ElfState::Working
                } else {
                    ElfState::TakingHolidays
                }
            }
            ElfState::TakingHolidays => {
                ws.log(Action::ElfHolidays(self.id)).await;
                return Ok(Step::Done);
            }
        };
        Ok(Step::Next(next))
    }
}
