//! Error types used by the workshop runtime and its configuration loader.
//!
//! This module defines three error types:
//!
//! - [`ConfigError`]: invalid input values, rejected before any worker starts.
//! - [`RuntimeError`]: failures of the orchestration itself (launch, panic, signal, sink I/O).
//! - [`SignalClosed`]: a wait on a synchronization primitive that was torn down.
//!
//! [`ConfigError`] and [`RuntimeError`] provide helper methods (`as_label`, `as_message`)
//! for logs and exit messages.

use std::io;
use thiserror::Error;

/// # Errors produced while loading the workshop configuration.
///
/// All of them are fatal: the core never observes an invalid configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value parsed fine but lies outside its allowed range.
    #[error("{field} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Smallest allowed value.
        min: u64,
        /// Largest allowed value.
        max: u64,
    },

    /// A raw argument is not a plain non-negative decimal number.
    #[error("{field} is not a number: {input:?}")]
    Invalid {
        /// Name of the offending parameter.
        field: &'static str,
        /// The raw input as given.
        input: String,
    },

    /// A required positional argument is absent.
    #[error("missing argument: {field}")]
    MissingArgument {
        /// Name of the absent parameter.
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use santa_workshop::ConfigError;
    ///
    /// let err = ConfigError::MissingArgument { field: "elf_count" };
    /// assert_eq!(err.as_label(), "config_missing_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::OutOfRange { .. } => "config_out_of_range",
            ConfigError::Invalid { .. } => "config_invalid",
            ConfigError::MissingArgument { .. } => "config_missing_argument",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!("{field}={value} outside [{min}, {max}]"),
            ConfigError::Invalid { field, input } => format!("{field}: bad number {input:?}"),
            ConfigError::MissingArgument { field } => format!("{field}: not given"),
        }
    }
}

/// # Errors produced by the workshop runtime.
///
/// These represent failures of the orchestration, not of the protocol: a
/// protocol that deadlocks or over-counts is a defect, never a runtime error.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A worker could not be started; every already started worker was torn down.
    #[error("failed to launch worker {worker}: {reason}")]
    Launch {
        /// Name of the worker that could not be started.
        worker: String,
        /// Why the launcher refused it.
        reason: String,
    },

    /// A worker panicked before reaching its terminal state.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Name of the panicked worker (or task id when unknown).
        worker: String,
    },

    /// A termination signal arrived before every worker finished.
    #[error("interrupted by termination signal")]
    Interrupted,

    /// Writing the action log failed at least once during the run.
    #[error("action log write failed: {0}")]
    Log(#[from] io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use santa_workshop::RuntimeError;
    ///
    /// let err = RuntimeError::Interrupted;
    /// assert_eq!(err.as_label(), "runtime_interrupted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Launch { .. } => "runtime_launch_failed",
            RuntimeError::WorkerPanicked { .. } => "runtime_worker_panicked",
            RuntimeError::Interrupted => "runtime_interrupted",
            RuntimeError::Log(_) => "runtime_log_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Launch { worker, reason } => {
                format!("launch of {worker} failed: {reason}")
            }
            RuntimeError::WorkerPanicked { worker } => format!("{worker} panicked"),
            RuntimeError::Interrupted => "interrupted".to_string(),
            RuntimeError::Log(e) => format!("log: {e}"),
        }
    }
}

/// A wait was attempted on a primitive that has been closed during teardown.
///
/// Role state machines propagate it with `?`; the worker loop then exits
/// without reporting completion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("signal closed")]
pub struct SignalClosed;
