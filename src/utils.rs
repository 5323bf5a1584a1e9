//! Shared DSP helpers used by the oscillator bank and its sinks.

pub mod buffer;
pub mod clip;
pub mod smoothed;
