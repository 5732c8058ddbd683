//! # Workshop actions: the vocabulary of the action log.
//!
//! Every line the [`ActionLog`](crate::workshop::ActionLog) writes is one [`Action`]
//! rendered through [`Display`](std::fmt::Display):
//!
//! ```text
//! Santa: going to sleep        Elf 3: started          RD 2: rstarted
//! Santa: helping elves         Elf 3: need help        RD 2: return home
//! Santa: closing workshop      Elf 3: get help         RD 2: get hitched
//! Santa: Christmas started     Elf 3: taking holidays
//! ```
//!
//! [`Action`] also implements [`FromStr`] so a written log can be read back
//! (the scenario tests and external checkers do this).

use std::fmt;
use std::str::FromStr;

/// Identity of a worker taking part in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkerId {
    /// The single coordinator.
    Santa,
    /// Elf with a 1-based id.
    Elf(u16),
    /// Reindeer with a 1-based id.
    Reindeer(u16),
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Santa => f.write_str("Santa"),
            WorkerId::Elf(id) => write!(f, "Elf {id}"),
            WorkerId::Reindeer(id) => write!(f, "RD {id}"),
        }
    }
}

/// One loggable step of a worker's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SantaSleeping,
    SantaHelping,
    SantaClosing,
    ChristmasStarted,
    ElfStarted(u16),
    ElfNeedHelp(u16),
    ElfGetHelp(u16),
    ElfHolidays(u16),
    ReindeerStarted(u16),
    ReindeerHome(u16),
    ReindeerHitched(u16),
}

impl Action {
    /// Worker that performs this action.
    pub fn worker(&self) -> WorkerId {
        match *self {
            Action::SantaSleeping
            | Action::SantaHelping
            | Action::SantaClosing
            | Action::ChristmasStarted => WorkerId::Santa,
            Action::ElfStarted(id)
            | Action::ElfNeedHelp(id)
            | Action::ElfGetHelp(id)
            | Action::ElfHolidays(id) => WorkerId::Elf(id),
            Action::ReindeerStarted(id)
            | Action::ReindeerHome(id)
            | Action::ReindeerHitched(id) => WorkerId::Reindeer(id),
        }
    }

    /// Returns a short stable label (snake_case), independent of the worker id.
    pub fn as_label(&self) -> &'static str {
        match self {
            Action::SantaSleeping => "santa_sleeping",
            Action::SantaHelping => "santa_helping",
            Action::SantaClosing => "santa_closing",
            Action::ChristmasStarted => "christmas_started",
            Action::ElfStarted(_) => "elf_started",
            Action::ElfNeedHelp(_) => "elf_need_help",
            Action::ElfGetHelp(_) => "elf_get_help",
            Action::ElfHolidays(_) => "elf_holidays",
            Action::ReindeerStarted(_) => "reindeer_started",
            Action::ReindeerHome(_) => "reindeer_home",
            Action::ReindeerHitched(_) => "reindeer_hitched",
        }
    }

    /// The text after the `<worker>: ` prefix.
    fn deed(&self) -> &'static str {
        match self {
            Action::SantaSleeping => "going to sleep",
            Action::SantaHelping => "helping elves",
            Action::SantaClosing => "closing workshop",
            Action::ChristmasStarted => "Christmas started",
            Action::ElfStarted(_) => "started",
            Action::ElfNeedHelp(_) => "need help",
            Action::ElfGetHelp(_) => "get help",
            Action::ElfHolidays(_) => "taking holidays",
            Action::ReindeerStarted(_) => "rstarted",
            Action::ReindeerHome(_) => "return home",
            Action::ReindeerHitched(_) => "get hitched",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.worker(), self.deed())
    }
}

/// Error returned when a string is not a rendered [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized action: {0:?}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseActionError(s.to_string());
        let (who, deed) = s.split_once(": ").ok_or_else(bad)?;

        if who == "Santa" {
            return match deed {
                "going to sleep" => Ok(Action::SantaSleeping),
                "helping elves" => Ok(Action::SantaHelping),
                "closing workshop" => Ok(Action::SantaClosing),
                "Christmas started" => Ok(Action::ChristmasStarted),
                _ => Err(bad()),
            };
        }

        let (kind, id) = who.split_once(' ').ok_or_else(bad)?;
        let id: u16 = id.parse().map_err(|_| bad())?;
        match (kind, deed) {
            ("Elf", "started") => Ok(Action::ElfStarted(id)),
            ("Elf", "need help") => Ok(Action::ElfNeedHelp(id)),
            ("Elf", "get help") => Ok(Action::ElfGetHelp(id)),
            ("Elf", "taking holidays") => Ok(Action::ElfHolidays(id)),
            ("RD", "rstarted") => Ok(Action::ReindeerStarted(id)),
            ("RD", "return home") => Ok(Action::ReindeerHome(id)),
            ("RD", "get hitched") => Ok(Action::ReindeerHitched(id)),
            _ => Err(bad()),
        }
    }
}
