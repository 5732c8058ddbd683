//! # Santa.
//!
//! Sleeps until woken, then either helps a batch of three elves or, once every
//! reindeer is home, closes the workshop and starts Christmas. Reindeer always
//! win: if both a batch and the last reindeer are waiting, Santa closes.

use async_trait::async_trait;

use super::{Role, Step};
use crate::error::SignalClosed;
use crate::events::{Action, WorkerId};
use crate::workshop::{BATCH, Workshop};

/// Santa's states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SantaState {
    Sleeping,
    Deciding,
    HelpingElves,
    ClosingWorkshop,
    Hitching,
    ChristmasStarted,
}

/// The coordinator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Santa;

impl Santa {
    pub fn new() -> Self {
        Santa
    }
}

#[async_trait]
impl Role for Santa {
    type State = SantaState;

    fn id(&self) -> WorkerId {
        WorkerId::Santa
    }

    fn start(&self) -> SantaState {
        SantaState::Sleeping
    }

    async fn step(
        &self,
        state: SantaState,
        ws: &Workshop,
    ) -> Result<Step<SantaState>, SignalClosed> {
        let signals = ws.signals();
        let next = match state {
            SantaState::Sleeping => {
                ws.log(Action::SantaSleeping).await;
                signals.wake_santa.wait().await?;
                SantaState::Deciding
            }
            SantaState::Deciding => {
                if ws.reindeer_all_home().await {
                    SantaState::ClosingWorkshop
                } else {
                    SantaState::HelpingElves
                }
            }
            SantaState::HelpingElves => {
                ws.log(Action::SantaHelping).await;
                ws.release_elves(BATCH, "help_round");
                ws.serve_batch().await;
                signals.workshop_slot.release(1);
                SantaState::Sleeping
            }
            SantaState::ClosingWorkshop => {
                let still_waiting = ws.close_workshop().await;
                ws.release_elves(still_waiting, "closure");
                // Elves queued on the slot re-check, see the closure and stand down.
                signals.workshop_slot.release(1);
                signals
                    .reindeer_release
                    .release(ws.config().reindeer() as usize);
                SantaState::Hitching
            }
            SantaState::Hitching => {
                signals.all_hitched.wait().await?;
                SantaState::ChristmasStarted
            }
            SantaState::ChristmasStarted => {
                ws.log(Action::ChristmasStarted).await;
                return Ok(Step::Done);
            }
        };
        Ok(Step::Next(next))
    }
}
