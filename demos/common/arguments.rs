use std::path::PathBuf;

use arg::{parse_args, Args};

use gsynth::{ClipMode, FrequencyPreset, LfoCoupling, SynthConfig, Waveform};

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

// -------------------------------------------------------------------------------------------------

/// Default program arguments for gsynth demo applications.
#[derive(Args, Debug, Default)]
#[allow(unused)]
pub struct Arguments {
    #[arg(short = "o", long = "output")]
    /// Write audio output into the given wav file, instead of using the default audio device.
    pub output_path: Option<PathBuf>,
    #[arg(short = "d", long = "duration")]
    /// Length of the wav file output in seconds. By default 10 seconds.
    pub duration: Option<f32>,
    #[arg(short = "v", long = "voices")]
    /// Number of oscillator voices in the bank.
    pub voice_count: Option<usize>,
    #[arg(short = "w", long = "waveform")]
    /// Oscillator waveform: \"sine\", \"saw\", \"square\" or \"triangle\".
    pub waveform: Option<Waveform>,
    #[arg(short = "p", long = "preset")]
    /// Frequency preset: \"linear\" or \"octave-interleaved\".
    pub frequency_preset: Option<FrequencyPreset>,
    #[arg(short = "c", long = "coupling")]
    /// LFO coupling: \"per-sample\" or \"per-voice\".
    pub lfo_coupling: Option<LfoCoupling>,
    #[arg(long = "clip")]
    /// Clipping of the mixed output: \"soft\" or \"hard\".
    pub clip_mode: Option<ClipMode>,
    #[arg(long = "width")]
    /// Width of the control surface in pixels. By default 1280.
    pub width: Option<u32>,
    #[arg(long = "height")]
    /// Height of the control surface in pixels. By default 800.
    pub height: Option<u32>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level to \"debug\", \"info\", \"warn\" or \"error\".
    /// By default \"debug\" in dev builds and \"warn\" in release builds.
    pub log_level: Option<log::Level>,
}

impl Arguments {
    /// Apply all set arguments to the default synth config.
    #[allow(unused)]
    pub fn synth_config(&self) -> SynthConfig {
        let mut config = SynthConfig::default();
        if let Some(voice_count) = self.voice_count {
            config = config.voice_count(voice_count);
        }
        if let Some(waveform) = self.waveform {
            config = config.waveform(waveform);
        }
        if let Some(preset) = self.frequency_preset {
            config = config.frequency_preset(preset);
        }
        if let Some(coupling) = self.lfo_coupling {
            config = config.lfo_coupling(coupling);
        }
        if let Some(clip_mode) = self.clip_mode {
            config = config.clip_mode(clip_mode);
        }
        config
    }

    /// Wav output length in seconds.
    #[allow(unused)]
    pub fn duration(&self) -> f32 {
        self.duration.unwrap_or(10.0).max(0.0)
    }

    /// Control surface extent in pixels.
    #[allow(unused)]
    pub fn surface_size(&self) -> (f32, f32) {
        (
            self.width.unwrap_or(1280) as f32,
            self.height.unwrap_or(800) as f32,
        )
    }
}

/// Parse common demo arguments and apply the log-level arg to the logger
#[allow(unused)]
pub fn parse() -> Arguments {
    // Parse args
    let args = parse_args::<Arguments>();

    create_logger(args.log_level);
    args
}

// -------------------------------------------------------------------------------------------------

/// Create default logger from arguments. Invoked from `parse`.
#[allow(unused)]
pub fn create_logger(log_level: Option<log::Level>) {
    // Init logger
    simple_logger::SimpleLogger::new()
        // use default or arg level by default
        .with_level(log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        .init()
        .expect("Failed to set logger");
}
