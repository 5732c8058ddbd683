//! # Workshop and runtime configuration.
//!
//! - [`Config`]: the four protocol parameters, validated on construction.
//!   The core never sees an out-of-range value.
//! - [`SupervisorConfig`]: runtime settings of the [`Supervisor`](crate::Supervisor).
//!
//! ## Ranges
//! | parameter             | range       |
//! |-----------------------|-------------|
//! | `elf_count`           | 1 ..= 1000  |
//! | `reindeer_count`      | 1 ..= 19    |
//! | `elf_work_ms`         | 0 ..= 1000  |
//! | `reindeer_holiday_ms` | 0 ..= 1000  |

use std::time::Duration;

use crate::error::ConfigError;

const ELVES: (&str, u64, u64) = ("elf_count", 1, 1000);
const REINDEER: (&str, u64, u64) = ("reindeer_count", 1, 19);
const ELF_WORK: (&str, u64, u64) = ("elf_work_ms", 0, 1000);
const HOLIDAY: (&str, u64, u64) = ("reindeer_holiday_ms", 0, 1000);

/// Validated protocol parameters.
///
/// Fields are private so an instance is always in range; use [`Config::new`]
/// or [`Config::from_args`].
///
/// ## Example
/// ```
/// use santa_workshop::Config;
///
/// let cfg = Config::new(5, 4, 100, 200).unwrap();
/// assert_eq!(cfg.total_workers(), 10);
/// assert!(Config::new(5, 20, 100, 200).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    elves: u16,
    reindeer: u16,
    elf_work: Duration,
    reindeer_holiday: Duration,
}

impl Config {
    /// Validates and builds a configuration.
    pub fn new(
        elf_count: u64,
        reindeer_count: u64,
        elf_work_ms: u64,
        reindeer_holiday_ms: u64,
    ) -> Result<Self, ConfigError> {
        let elves = check(ELVES, elf_count)?;
        let reindeer = check(REINDEER, reindeer_count)?;
        let elf_work = check(ELF_WORK, elf_work_ms)?;
        let holiday = check(HOLIDAY, reindeer_holiday_ms)?;

        Ok(Self {
            elves: elves as u16,
            reindeer: reindeer as u16,
            elf_work: Duration::from_millis(elf_work),
            reindeer_holiday: Duration::from_millis(holiday),
        })
    }

    /// Parses the four positional arguments `NE NR TE TR`.
    ///
    /// Each argument must consist of ASCII digits only (no sign, no spaces);
    /// extra trailing arguments are ignored.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let fields = [ELVES.0, REINDEER.0, ELF_WORK.0, HOLIDAY.0];
        let mut values = [0u64; 4];

        for (i, field) in fields.into_iter().enumerate() {
            let raw = args
                .get(i)
                .ok_or(ConfigError::MissingArgument { field })?
                .as_ref();
            values[i] = parse_number(field, raw)?;
        }

        Config::new(values[0], values[1], values[2], values[3])
    }

    /// Number of elves.
    #[inline]
    pub fn elves(&self) -> u16 {
        self.elves
    }

    /// Number of reindeer.
    #[inline]
    pub fn reindeer(&self) -> u16 {
        self.reindeer
    }

    /// Upper bound of one elf work cycle.
    #[inline]
    pub fn elf_work(&self) -> Duration {
        self.elf_work
    }

    /// Upper bound of a reindeer holiday.
    #[inline]
    pub fn reindeer_holiday(&self) -> Duration {
        self.reindeer_holiday
    }

    /// Santa plus every elf and reindeer.
    #[inline]
    pub fn total_workers(&self) -> usize {
        1 + self.elves as usize + self.reindeer as usize
    }
}

fn check((field, min, max): (&'static str, u64, u64), value: u64) -> Result<u64, ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn parse_number(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = || ConfigError::Invalid {
        field,
        input: raw.to_string(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // Digits only, so the sole failure left is overflow; saturate so it reports as out of range.
    Ok(raw.parse::<u64>().unwrap_or(u64::MAX))
}

/// Runtime settings for the supervisor.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
/// - `handle_signals`: listen for SIGINT/SIGTERM/SIGQUIT while waiting for completion
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Capacity of the event bus broadcast channel.
    ///
    /// A listener lagging behind by more than `bus_capacity` events skips the
    /// oldest ones and reports the loss to every subscriber as a
    /// `SubscriberOverflow`; the action log itself is never affected.
    pub bus_capacity: usize,

    /// Whether an OS termination signal interrupts the run.
    pub handle_signals: bool,
}

impl SupervisorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// - `bus_capacity = 8192`
    /// - `handle_signals = true`
    fn default() -> Self {
        Self {
            bus_capacity: 8192,
            handle_signals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_edges() {
        assert!(Config::new(1, 1, 0, 0).is_ok());
        assert!(Config::new(1000, 19, 1000, 1000).is_ok());
    }

    #[test]
    fn rejects_each_field_out_of_range() {
        let cases = [
            (Config::new(0, 1, 0, 0), "elf_count"),
            (Config::new(1001, 1, 0, 0), "elf_count"),
            (Config::new(1, 0, 0, 0), "reindeer_count"),
            (Config::new(1, 20, 0, 0), "reindeer_count"),
            (Config::new(1, 1, 1001, 0), "elf_work_ms"),
            (Config::new(1, 1, 0, 1001), "reindeer_holiday_ms"),
        ];
        for (res, expected) in cases {
            match res {
                Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected out of range for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_args_parses_positional_values() {
        let cfg = Config::from_args(&["5", "4", "100", "200"]).unwrap();
        assert_eq!(cfg.elves(), 5);
        assert_eq!(cfg.reindeer(), 4);
        assert_eq!(cfg.elf_work(), Duration::from_millis(100));
        assert_eq!(cfg.reindeer_holiday(), Duration::from_millis(200));
        assert_eq!(cfg.total_workers(), 10);
    }

    #[test]
    fn from_args_rejects_non_digits() {
        for bad in ["-1", "+3", "3a", "", " 3", "1.5"] {
            let err = Config::from_args(&[bad, "1", "0", "0"]).unwrap_err();
            assert_eq!(err.as_label(), "config_invalid", "input {bad:?}");
        }
    }

    #[test]
    fn from_args_reports_missing_field() {
        let err = Config::from_args(&["3", "1", "0"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingArgument {
                field: "reindeer_holiday_ms"
            }
        );
    }

    #[test]
    fn from_args_huge_number_is_out_of_range() {
        let err = Config::from_args(&["99999999999999999999999", "1", "0", "0"]).unwrap_err();
        assert_eq!(err.as_label(), "config_out_of_range");
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = SupervisorConfig {
            bus_capacity: 0,
            ..SupervisorConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
