//! # Pace: how long elves work and reindeer holiday.
//!
//! Workers never pick their own sleep durations; they ask a [`DurationSource`].
//! The built-in source is [`Pace`], which draws each duration from the configured
//! maximum according to a [`Spread`]:
//!
//! - [`Spread::Exact`]: always the maximum, predictable delays
//! - [`Spread::Full`]: random delay in [0, max]
//! - [`Spread::UpperHalf`]: max/2 + random[0, max/2]
//!
//! [`Pace::random`] (the default) uses `Full` for elves and `UpperHalf` for reindeer,
//! so reindeer holidays are skewed toward the long end of their range.
//! [`Pace::exact`] is the deterministic stand-in.

use std::time::Duration;

use rand::Rng;

/// Supplies the bounded durations workers sleep for.
///
/// Implementations must return a value in `[0, max]`. `elf` / `reindeer` are
/// 1-based worker ids, so sources may give individual workers their own timing.
pub trait DurationSource: Send + Sync + 'static {
    /// Duration of one elf work cycle.
    fn elf_work(&self, elf: u16, max: Duration) -> Duration;

    /// Duration of a reindeer's holiday.
    fn reindeer_holiday(&self, reindeer: u16, max: Duration) -> Duration;
}

/// Distribution of a duration drawn from `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Spread {
    /// Always `max`.
    Exact,

    /// Uniform in `[0, max]`.
    #[default]
    Full,

    /// `max/2 + uniform[0, max/2]`.
    UpperHalf,
}

impl Spread {
    /// Draws one duration bounded by `max`.
    pub fn apply(&self, max: Duration) -> Duration {
        match self {
            Spread::Exact => max,
            Spread::Full => full(max),
            Spread::UpperHalf => upper_half(max),
        }
    }
}

/// Uniform in [0, max].
fn full(max: Duration) -> Duration {
    let ms = max.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// max/2 + uniform[0, max/2]
fn upper_half(max: Duration) -> Duration {
    let ms = max.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let extra = if ms - half == 0 {
        0
    } else {
        rand::rng().random_range(0..=ms - half)
    };
    Duration::from_millis(half + extra)
}

/// Per-role [`Spread`] selection; the default [`DurationSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pace {
    /// Spread of elf work cycles.
    pub elf: Spread,
    /// Spread of reindeer holidays.
    pub reindeer: Spread,
}

impl Pace {
    /// Uniform elf work, upper-half reindeer holidays.
    pub fn random() -> Self {
        Self {
            elf: Spread::Full,
            reindeer: Spread::UpperHalf,
        }
    }

    /// Every duration equals its configured maximum.
    pub fn exact() -> Self {
        Self {
            elf: Spread::Exact,
            reindeer: Spread::Exact,
        }
    }
}

impl Default for Pace {
    fn default() -> Self {
        Pace::random()
    }
}

impl DurationSource for Pace {
    fn elf_work(&self, _elf: u16, max: Duration) -> Duration {
        self.elf.apply(max)
    }

    fn reindeer_holiday(&self, _reindeer: u16, max: Duration) -> Duration {
        self.reindeer.apply(max)
    }
}
