//! # Reindeer.
//!
//! One holiday, one trip home, one hitch. The last reindeer home wakes Santa;
//! the last one hitched releases `all_hitched`.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Role, Step, pause};
use crate::error::SignalClosed;
use crate::events::{Action, WorkerId};
use crate::policies::DurationSource;
use crate::workshop::Workshop;

/// Reindeer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReindeerState {
    Started,
    OnHoliday,
    ReturnedHome,
    WaitingHitch,
    Hitched,
}

/// One reindeer.
pub struct Reindeer {
    id: u16,
    pace: Arc<dyn DurationSource>,
}

impl Reindeer {
    /// Creates reindeer `id` (1-based) drawing its holiday from `pace`.
    pub fn new(id: u16, pace: Arc<dyn DurationSource>) -> Self {
        Self { id, pace }
    }
}

#[async_trait]
impl Role for Reindeer {
    type State = ReindeerState;

    fn id(&self) -> WorkerId {
        WorkerId::Reindeer(self.id)
    }

    fn start(&self) -> ReindeerState {
        ReindeerState::Started
    }

    async fn step(
        &self,
        state: ReindeerState,
        ws: &Workshop,
    ) -> Result<Step<ReindeerState>, SignalClosed> {
        let signals = ws.signals();
        let next = match state {
            ReindeerState::Started => {
                ws.log(Action::ReindeerStarted(self.id)).await;
                ReindeerState::OnHoliday
            }
            ReindeerState::OnHoliday => {
                let holiday = self
                    .pace
                    .reindeer_holiday(self.id, ws.config().reindeer_holiday());
                pause(holiday).await;
                ReindeerState::ReturnedHome
            }
            ReindeerState::ReturnedHome => {
                ws.log(Action::ReindeerHome(self.id)).await;
                if ws.return_home().await {
                    signals.wake_santa.release(1);
                }
                ReindeerState::WaitingHitch
            }
            ReindeerState::WaitingHitch => {
                signals.reindeer_release.wait().await?;
                ReindeerState::Hitched
            }
            ReindeerState::Hitched => {
                ws.log(Action::ReindeerHitched(self.id)).await;
                if ws.hitch().await {
                    signals.all_hitched.release(1);
                }
                return Ok(Step::Done);
            }
        };
        Ok(Step::Next(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::events::Bus;
    use crate::policies::Pace;
    use crate::workshop::MemorySink;

    fn workshop(reindeer: u64) -> (Workshop, MemorySink) {
        let sink = MemorySink::new();
        let cfg = Config::new(1, reindeer, 0, 0).unwrap();
        (Workshop::new(cfg, Box::new(sink.clone()), Bus::new(64)), sink)
    }

    fn reindeer(id: u16) -> Reindeer {
        Reindeer::new(id, Arc::new(Pace::exact()))
    }

    #[tokio::test]
    async fn only_the_last_reindeer_home_wakes_santa() {
        let (ws, sink) = workshop(2);

        reindeer(1).step(ReindeerState::ReturnedHome, &ws).await.unwrap();
        assert_eq!(ws.signals().wake_santa.available(), 0);

        reindeer(2).step(ReindeerState::ReturnedHome, &ws).await.unwrap();
        assert_eq!(ws.signals().wake_santa.available(), 1);

        assert_eq!(sink.lines(), vec!["1: RD 1: return home", "2: RD 2: return home"]);
    }

    #[tokio::test]
    async fn only_the_last_hitched_releases_all_hitched() {
        let (ws, _) = workshop(2);

        let done = reindeer(2).step(ReindeerState::Hitched, &ws).await.unwrap();
        assert_eq!(done, Step::Done);
        assert_eq!(ws.signals().all_hitched.available(), 0);

        reindeer(1).step(ReindeerState::Hitched, &ws).await.unwrap();
        assert_eq!(ws.signals().all_hitched.available(), 1);
    }

    #[tokio::test]
    async fn waits_for_santa_before_hitching() {
        let (ws, _) = workshop(1);
        ws.signals().reindeer_release.release(1);
        let next = reindeer(1).step(ReindeerState::WaitingHitch, &ws).await.unwrap();
        assert_eq!(next, Step::Next(ReindeerState::Hitched));
        assert_eq!(ws.signals().reindeer_release.available(), 0);
    }
}
