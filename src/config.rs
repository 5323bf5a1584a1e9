use crate::{
    bank::{BaseFrequencyMode, DepthControl, FrequencyPreset},
    error::Error,
    modulation::{AmpModulation, LfoCoupling},
    oscillator::Waveform,
    utils::clip::ClipMode,
};

// -------------------------------------------------------------------------------------------------

/// Options to create an oscillator bank and its buffer scheduler.
///
/// Use the chained setters to customize the defaults and call [`SynthConfig::validate`] (or let
/// the bank do it) to check all values are within their valid ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz. Must be > 0. By default 44100.
    pub sample_rate: u32,
    /// Number of samples per rendered buffer. Must be > 0. By default 1024.
    pub block_size: usize,
    /// Number of voices in the bank. Must be > 0. By default 16.
    pub voice_count: usize,
    /// Waveform of all voices. By default [`Waveform::Sine`].
    pub waveform: Waveform,
    /// Base frequency in Hz of the first voice. Must be >= 0. By default 50.
    pub base_frequency: f32,
    /// Base frequency offset in Hz, spread linearly across voices. Must be >= 0. By default 5.
    pub base_frequency_spread: f32,
    /// How the base frequency is derived. By default [`BaseFrequencyMode::Fixed`].
    pub base_frequency_mode: BaseFrequencyMode,
    /// Frequency range in Hz the horizontal control position adds to the base frequency.
    /// Must be >= 0. By default 100.
    pub control_frequency_range: f32,
    /// Voice frequency multiplier. Must be >= 0. By default 10.
    pub frequency_scale: f32,
    /// How voice frequencies are scaled by their index. By default [`FrequencyPreset::Linear`].
    pub frequency_preset: FrequencyPreset,
    /// Frequency smoothing factor applied once per buffer, in range (0, 1].
    /// 1 disables smoothing. By default 0.1.
    pub smoothing_factor: f32,
    /// LFO rate in Hz. Must be >= 0. By default 0.5.
    pub lfo_frequency: f32,
    /// LFO modulation depth in range [0, 1]. By default 0.01.
    pub modulation_depth: f32,
    /// How the control position affects the modulation depth. By default
    /// [`DepthControl::Vertical`].
    pub depth_control: DepthControl,
    /// How the shared LFO advances across voices. By default [`LfoCoupling::PerSample`].
    pub lfo_coupling: LfoCoupling,
    /// Shape of the amplitude modulation. By default [`AmpModulation::Bipolar`].
    pub amp_modulation: AmpModulation,
    /// Clipping policy for the mixed voices. By default [`ClipMode::Soft`].
    pub clip_mode: ClipMode,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            block_size: Self::DEFAULT_BLOCK_SIZE,
            voice_count: Self::DEFAULT_VOICE_COUNT,
            waveform: Waveform::default(),
            base_frequency: 50.0,
            base_frequency_spread: 5.0,
            base_frequency_mode: BaseFrequencyMode::default(),
            control_frequency_range: 100.0,
            frequency_scale: 10.0,
            frequency_preset: FrequencyPreset::default(),
            smoothing_factor: 0.1,
            lfo_frequency: 0.5,
            modulation_depth: 0.01,
            depth_control: DepthControl::default(),
            lfo_coupling: LfoCoupling::default(),
            amp_modulation: AmpModulation::default(),
            clip_mode: ClipMode::default(),
        }
    }
}

impl SynthConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
    pub const DEFAULT_BLOCK_SIZE: usize = 1024;
    pub const DEFAULT_VOICE_COUNT: usize = 16;

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
    pub fn voice_count(mut self, voice_count: usize) -> Self {
        self.voice_count = voice_count;
        self
    }
    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }
    pub fn base_frequency(mut self, base_frequency: f32) -> Self {
        self.base_frequency = base_frequency;
        self
    }
    pub fn base_frequency_spread(mut self, spread: f32) -> Self {
        self.base_frequency_spread = spread;
        self
    }
    pub fn base_frequency_mode(mut self, mode: BaseFrequencyMode) -> Self {
        self.base_frequency_mode = mode;
        self
    }
    pub fn control_frequency_range(mut self, range: f32) -> Self {
        self.control_frequency_range = range;
        self
    }
    pub fn frequency_scale(mut self, scale: f32) -> Self {
        self.frequency_scale = scale;
        self
    }
    pub fn frequency_preset(mut self, preset: FrequencyPreset) -> Self {
        self.frequency_preset = preset;
        self
    }
    pub fn smoothing_factor(mut self, smoothing_factor: f32) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }
    pub fn lfo_frequency(mut self, lfo_frequency: f32) -> Self {
        self.lfo_frequency = lfo_frequency;
        self
    }
    pub fn modulation_depth(mut self, modulation_depth: f32) -> Self {
        self.modulation_depth = modulation_depth;
        self
    }
    pub fn depth_control(mut self, depth_control: DepthControl) -> Self {
        self.depth_control = depth_control;
        self
    }
    pub fn lfo_coupling(mut self, lfo_coupling: LfoCoupling) -> Self {
        self.lfo_coupling = lfo_coupling;
        self
    }
    pub fn amp_modulation(mut self, amp_modulation: AmpModulation) -> Self {
        self.amp_modulation = amp_modulation;
        self
    }
    pub fn clip_mode(mut self, clip_mode: ClipMode) -> Self {
        self.clip_mode = clip_mode;
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rate == 0 {
            return Err(Error::ParameterError(
                "config 'sample_rate' must be > 0".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(Error::ParameterError(
                "config 'block_size' must be > 0".to_string(),
            ));
        }
        if self.voice_count == 0 {
            return Err(Error::ParameterError(
                "config 'voice_count' must be > 0".to_string(),
            ));
        }
        for (name, value) in [
            ("base_frequency", self.base_frequency),
            ("base_frequency_spread", self.base_frequency_spread),
            ("control_frequency_range", self.control_frequency_range),
            ("frequency_scale", self.frequency_scale),
            ("lfo_frequency", self.lfo_frequency),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(Error::ParameterError(format!(
                    "config '{name}' value is '{value}'"
                )));
            }
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(Error::ParameterError(format!(
                "config 'smoothing_factor' value is '{}'",
                self.smoothing_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.modulation_depth) {
            return Err(Error::ParameterError(format!(
                "config 'modulation_depth' value is '{}'",
                self.modulation_depth
            )));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
