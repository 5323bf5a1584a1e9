#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod bank;
mod config;
mod control;
mod error;
mod modulation;
mod oscillator;
mod output;
mod presenter;
mod scheduler;
mod voice;

// public, flat re-exports
pub use error::Error;

pub use config::SynthConfig;

pub use bank::{BaseFrequencyMode, DepthControl, FrequencyPreset, VoiceBank};
pub use modulation::{AmpModulation, Lfo, LfoCoupling, Modulation};
pub use oscillator::{Oscillator, Waveform};
pub use voice::{Voice, VoiceModulation};

pub use scheduler::{BufferScheduler, SchedulerState, SchedulerStats};

pub use control::{ControlPosition, ControlSource};
pub use presenter::{Telemetry, VisualPresenter};

#[cfg(feature = "cpal-output")]
pub use output::AudioHostId;
pub use output::PlaybackSink;

pub use utils::clip::ClipMode;

// public mods
pub mod utils;
pub mod waveform;

pub mod outputs {
    //! Available [`PlaybackSink`](super::PlaybackSink) implementations.

    #[cfg(feature = "cpal-output")]
    pub use super::output::cpal::CpalSink;
    #[cfg(feature = "wav-output")]
    pub use super::output::wav::WavSink;
}
