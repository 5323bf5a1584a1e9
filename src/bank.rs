//! Oscillator bank: a fixed set of voices, mixed into a single mono buffer.

use strum::{Display, EnumString, VariantNames};

use crate::{
    config::SynthConfig,
    control::ControlPosition,
    error::Error,
    modulation::{Lfo, LfoCoupling, Modulation},
    presenter::Telemetry,
    utils::{
        buffer::clear_buffer,
        clip::{hard_clip_buffer, ClipMode},
    },
    voice::{Voice, VoiceModulation},
};

// -------------------------------------------------------------------------------------------------

/// How voice frequencies get scaled by their index in the bank.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum FrequencyPreset {
    /// Constant scale factor: frequencies rise linearly with the voice index.
    #[default]
    Linear,
    /// Scale factor rises with the voice index and doubles on odd voices, which interleaves
    /// two quadratic series an octave apart.
    OctaveInterleaved,
}

/// How the per voice base frequency gets calculated.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum BaseFrequencyMode {
    /// Base frequency plus a linear spread across voices.
    #[default]
    Fixed,
    /// Fixed base frequency, weighted by the LFO output and the horizontal control position.
    /// The LFO gets sampled once per buffer.
    LfoWeighted,
}

/// How the control position affects the LFO modulation depth.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum DepthControl {
    /// Always use the configured modulation depth.
    Fixed,
    /// Scale the configured modulation depth by the vertical control position.
    #[default]
    Vertical,
}

// -------------------------------------------------------------------------------------------------

/// A bank of voices sharing one LFO.
///
/// Per buffer, [`VoiceBank::update_frequencies`] derives new target frequencies from the control
/// position and moves each voice one smoothing step towards it, then [`VoiceBank::render`] mixes
/// all voices in ascending index order into the output buffer.
#[derive(Debug, Clone)]
pub struct VoiceBank {
    config: SynthConfig,
    voices: Vec<Voice>,
    lfo: Lfo,
    modulation_buffer: Vec<Modulation>,
    telemetry: Telemetry,
}

impl VoiceBank {
    /// Create a new bank from the given config. Returns an error when the config is invalid.
    pub fn new(config: SynthConfig) -> Result<Self, Error> {
        config.validate()?;

        // a fully in-phase bank sums up to unit amplitude
        let amplitude = 1.0 / config.voice_count as f32;
        let voices = (0..config.voice_count)
            .map(|_| Voice::new(amplitude, config.smoothing_factor))
            .collect();
        let lfo = Lfo::new(
            config.sample_rate,
            config.lfo_frequency as f64,
            config.modulation_depth,
            config.amp_modulation,
        );
        let modulation_buffer = vec![Modulation::NONE; config.block_size];
        let telemetry = Telemetry {
            modulation_depth: lfo.depth(),
            ..Telemetry::default()
        };

        log::debug!(
            "created oscillator bank with {} {} voices at {} Hz, {} samples per block",
            config.voice_count,
            config.waveform,
            config.sample_rate,
            config.block_size
        );

        Ok(Self {
            config,
            voices,
            lfo,
            modulation_buffer,
            telemetry,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Voices, ordered by index.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }
    pub fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    /// The LFO which modulates all voices.
    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }
    pub fn lfo_mut(&mut self) -> &mut Lfo {
        &mut self.lfo
    }

    /// Frequency and modulation values of the last `update_frequencies` call.
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Base frequency of the voice at the given index for the given control position.
    pub fn base_frequency(&self, index: usize, control: ControlPosition) -> f32 {
        let config = &self.config;
        let position = self.voice_position(index);
        let base = config.base_frequency + position * config.base_frequency_spread;
        match config.base_frequency_mode {
            BaseFrequencyMode::Fixed => base,
            BaseFrequencyMode::LfoWeighted => base * (1.0 + self.lfo.value() * control.x()),
        }
    }

    /// Target frequency of the voice at the given index for the given control position.
    pub fn target_frequency(&self, index: usize, control: ControlPosition) -> f32 {
        let config = &self.config;
        let position = self.voice_position(index);
        let scale = match config.frequency_preset {
            FrequencyPreset::Linear => config.frequency_scale,
            FrequencyPreset::OctaveInterleaved => {
                let additive = if index % 2 == 0 { 1.0 } else { 2.0 };
                position * config.frequency_scale * additive
            }
        };
        let base = self.base_frequency(index, control);
        (base + control.x() * config.control_frequency_range) * position * scale
    }

    /// Update the modulation depth and all voice frequencies from the given control position.
    /// Voices move one smoothing step towards their new target frequency.
    pub fn update_frequencies(&mut self, control: ControlPosition) {
        let depth = match self.config.depth_control {
            DepthControl::Fixed => self.config.modulation_depth,
            DepthControl::Vertical => self.config.modulation_depth * control.y(),
        };
        self.lfo.set_depth(depth);

        let sample_rate = self.config.sample_rate;
        for index in 0..self.voices.len() {
            let frequency = self.target_frequency(index, control);
            let voice = &mut self.voices[index];
            voice.set_target_frequency(frequency);
            voice.update_frequency(sample_rate);
        }

        let last_index = self.voices.len() - 1;
        self.telemetry.frequency = self.target_frequency(last_index, control);
        self.telemetry.base_frequency = self.base_frequency(last_index, control);
        self.telemetry.modulation_depth = self.lfo.depth();
    }

    /// Clear the given buffer and mix all voices into it.
    pub fn render(&mut self, buffer: &mut [f32]) {
        clear_buffer(buffer);

        let waveform = self.config.waveform;
        let clip_mode = self.config.clip_mode;
        match self.config.lfo_coupling {
            LfoCoupling::PerSample => {
                let block_size = self.modulation_buffer.len();
                for chunk in buffer.chunks_mut(block_size) {
                    let modulation = &mut self.modulation_buffer[..chunk.len()];
                    self.lfo.process(modulation);
                    let modulation = &*modulation;
                    for voice in self.voices.iter_mut() {
                        voice.render(
                            chunk,
                            waveform,
                            VoiceModulation::Precomputed(modulation),
                            clip_mode,
                        );
                    }
                }
            }
            LfoCoupling::PerVoice => {
                for voice in self.voices.iter_mut() {
                    voice.render(
                        buffer,
                        waveform,
                        VoiceModulation::Shared(&mut self.lfo),
                        clip_mode,
                    );
                }
            }
        }

        if clip_mode == ClipMode::Hard {
            hard_clip_buffer(buffer);
        }
    }

    fn voice_position(&self, index: usize) -> f32 {
        index as f32 / self.voices.len() as f32
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use crate::oscillator::Waveform;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count()
    }

    #[test]
    fn invalid_config() {
        assert!(VoiceBank::new(SynthConfig::default().voice_count(0)).is_err());
        assert!(VoiceBank::new(SynthConfig::default().smoothing_factor(0.0)).is_err());
    }

    #[test]
    fn voice_amplitudes() {
        let bank = VoiceBank::new(SynthConfig::default().voice_count(8)).unwrap();
        assert_eq!(bank.voices().len(), 8);
        assert!(bank.voices().iter().all(|v| v.amplitude() == 0.125));
    }

    #[test]
    fn linear_target_frequencies() {
        let bank = VoiceBank::new(SynthConfig::default()).unwrap();
        let control = ControlPosition::new(0.5, 0.0);
        assert_eq!(bank.target_frequency(0, control), 0.0);
        assert!((bank.base_frequency(4, control) - 51.25).abs() < 1e-4);
        assert!((bank.target_frequency(4, control) - 253.125).abs() < 1e-3);
        // frequencies rise with the voice index
        let frequencies = (0..16)
            .map(|i| bank.target_frequency(i, control))
            .collect::<Vec<_>>();
        assert!(frequencies.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn octave_interleaved_target_frequencies() {
        let bank = VoiceBank::new(
            SynthConfig::default().frequency_preset(FrequencyPreset::OctaveInterleaved),
        )
        .unwrap();
        let control = ControlPosition::new(0.5, 0.0);
        assert!((bank.target_frequency(4, control) - 63.28125).abs() < 1e-3);
        assert!((bank.target_frequency(5, control) - 198.36426).abs() < 1e-3);
    }

    #[test]
    fn lfo_weighted_base_frequency() {
        let mut bank = VoiceBank::new(
            SynthConfig::default().base_frequency_mode(BaseFrequencyMode::LfoWeighted),
        )
        .unwrap();
        bank.lfo_mut().set_phase(0.25);
        let control = ControlPosition::new(0.5, 0.0);
        // lfo at its peak: weighted by 1 + 1 * 0.5
        assert!((bank.base_frequency(0, control) - 75.0).abs() < 1e-3);
        bank.lfo_mut().set_phase(0.0);
        assert!((bank.base_frequency(0, control) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn frequencies_are_smoothed_per_update() {
        let mut bank = VoiceBank::new(SynthConfig::default()).unwrap();
        let control = ControlPosition::new(0.5, 0.0);
        bank.update_frequencies(control);
        let voice = &bank.voices()[4];
        assert!((voice.target_frequency() - 253.125).abs() < 1e-3);
        assert!((voice.frequency() - 25.3125).abs() < 1e-3);
        for _ in 0..200 {
            bank.update_frequencies(control);
        }
        assert!((bank.voices()[4].frequency() - 253.125).abs() < 1e-2);
    }

    #[test]
    fn modulation_depth_control() {
        let mut bank = VoiceBank::new(SynthConfig::default()).unwrap();
        bank.update_frequencies(ControlPosition::new(0.0, 0.5));
        assert!((bank.lfo().depth() - 0.005).abs() < 1e-6);
        assert!((bank.telemetry().modulation_depth - 0.005).abs() < 1e-6);

        let mut bank =
            VoiceBank::new(SynthConfig::default().depth_control(DepthControl::Fixed)).unwrap();
        bank.update_frequencies(ControlPosition::new(0.0, 0.5));
        assert!((bank.lfo().depth() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn telemetry() {
        let mut bank = VoiceBank::new(SynthConfig::default().voice_count(4)).unwrap();
        let control = ControlPosition::new(1.0, 1.0);
        bank.update_frequencies(control);
        let telemetry = bank.telemetry();
        assert_eq!(telemetry.frequency, bank.target_frequency(3, control));
        assert_eq!(telemetry.base_frequency, bank.base_frequency(3, control));
    }

    #[test]
    fn single_voice_zero_crossings() {
        let config = SynthConfig::default()
            .voice_count(1)
            .modulation_depth(0.0)
            .smoothing_factor(1.0);
        let mut bank = VoiceBank::new(config).unwrap();
        bank.voices_mut()[0].init_frequency(440.0, 44100);
        let mut buffer = vec![0.0; 1024];
        bank.render(&mut buffer);
        let crossings = zero_crossings(&buffer);
        assert!(
            crossings == 20 || crossings == 21,
            "unexpected zero crossings: {crossings}"
        );
    }

    #[test]
    fn zero_depth_ignores_lfo_phase() {
        for coupling in [LfoCoupling::PerSample, LfoCoupling::PerVoice] {
            let config = SynthConfig::default()
                .voice_count(2)
                .modulation_depth(0.0)
                .lfo_frequency(3.0)
                .lfo_coupling(coupling);
            let mut bank_a = VoiceBank::new(config.clone()).unwrap();
            let mut bank_b = VoiceBank::new(config).unwrap();
            bank_b.lfo_mut().set_phase(0.37);

            let control = ControlPosition::new(0.7, 0.9);
            let mut buffer_a = vec![0.0; 1024];
            let mut buffer_b = vec![0.0; 1024];
            for _ in 0..4 {
                bank_a.update_frequencies(control);
                bank_b.update_frequencies(control);
                bank_a.render(&mut buffer_a);
                bank_b.render(&mut buffer_b);
                assert_eq!(buffer_a, buffer_b);
            }
            assert!(buffer_a.iter().any(|s| s.abs() > 0.1), "should not be silent");
        }
    }

    #[test]
    fn output_is_bounded() {
        for clip_mode in [ClipMode::Soft, ClipMode::Hard] {
            for waveform in [Waveform::Sine, Waveform::Saw, Waveform::Square, Waveform::Triangle] {
                let config = SynthConfig::default()
                    .waveform(waveform)
                    .clip_mode(clip_mode)
                    .modulation_depth(1.0)
                    .amp_modulation(crate::modulation::AmpModulation::Unipolar);
                let mut bank = VoiceBank::new(config).unwrap();
                let mut buffer = vec![0.0; 1024];
                for _ in 0..8 {
                    bank.update_frequencies(ControlPosition::new(1.0, 1.0));
                    bank.render(&mut buffer);
                    assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
                }
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = SynthConfig::default().modulation_depth(0.3);
        let mut bank_a = VoiceBank::new(config.clone()).unwrap();
        let mut bank_b = VoiceBank::new(config).unwrap();
        let mut buffer_a = vec![0.0; 512];
        let mut buffer_b = vec![0.0; 512];
        for step in 0..4 {
            let control = ControlPosition::new(step as f32 / 4.0, 0.5);
            bank_a.update_frequencies(control);
            bank_b.update_frequencies(control);
            bank_a.render(&mut buffer_a);
            bank_b.render(&mut buffer_b);
            assert_eq!(buffer_a, buffer_b);
        }
    }

    #[test]
    fn per_voice_coupling_advances_lfo_per_voice() {
        let config = SynthConfig::default()
            .sample_rate(1000)
            .block_size(100)
            .voice_count(4)
            .lfo_frequency(1.0);

        let mut per_sample = VoiceBank::new(config.clone()).unwrap();
        let mut buffer = vec![0.0; 100];
        per_sample.render(&mut buffer);
        assert!((per_sample.lfo().phase() - 0.1).abs() < 1e-9);

        let mut per_voice =
            VoiceBank::new(config.lfo_coupling(LfoCoupling::PerVoice)).unwrap();
        per_voice.render(&mut buffer);
        assert!((per_voice.lfo().phase() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn renders_buffers_larger_than_block_size() {
        let config = SynthConfig::default().block_size(64).modulation_depth(0.5);
        let control = ControlPosition::new(0.8, 1.0);

        let mut bank_a = VoiceBank::new(config.clone()).unwrap();
        bank_a.update_frequencies(control);
        let mut buffer_a = vec![0.0; 128];
        bank_a.render(&mut buffer_a);

        let mut bank_b = VoiceBank::new(config).unwrap();
        bank_b.update_frequencies(control);
        let mut buffer_b = vec![0.0; 128];
        bank_b.render(&mut buffer_b[..64]);
        bank_b.render(&mut buffer_b[64..]);

        assert_eq!(buffer_a, buffer_b);
    }
}
