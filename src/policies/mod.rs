//! # Timing policies for simulated work.
//!
//! - [`DurationSource`] the collaborator workers ask for sleep durations
//! - [`Pace`] the built-in source, one [`Spread`] per role

mod pace;

pub use pace::{DurationSource, Pace, Spread};
