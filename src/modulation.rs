//! LFO which feeds phase and amplitude modulation into the bank's voices.

use strum::{Display, EnumString, VariantNames};

use crate::oscillator::{sine, Oscillator};

// -------------------------------------------------------------------------------------------------

/// How the shared LFO gets advanced while rendering multiple voices.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum LfoCoupling {
    /// The LFO advances exactly once per sample index. All voices read the same modulation
    /// value for a given sample, so the LFO runs at its configured rate.
    #[default]
    PerSample,
    /// The LFO advances once per voice and sample, while voices are rendered one after another.
    /// With N voices, the LFO effectively runs N times faster than configured and each voice
    /// sees a different slice of the LFO cycle.
    PerVoice,
}

// -------------------------------------------------------------------------------------------------

/// Shape of the amplitude modulation around the unmodulated gain of 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum AmpModulation {
    /// `1 + lfo * depth`: swings symmetrically below and above 1.
    #[default]
    Bipolar,
    /// `1 + (lfo * 0.5 + 0.5) * depth`: only boosts, never attenuates.
    Unipolar,
    /// No amplitude modulation: gain stays at 1.
    Off,
}

impl AmpModulation {
    /// Amplitude multiplier for the given bipolar LFO value and modulation depth.
    #[inline]
    pub fn gain(self, lfo_value: f32, depth: f32) -> f32 {
        match self {
            AmpModulation::Bipolar => 1.0 + lfo_value * depth,
            AmpModulation::Unipolar => 1.0 + (lfo_value * 0.5 + 0.5) * depth,
            AmpModulation::Off => 1.0,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Modulation values for a single sample of a single voice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Modulation {
    /// Phase offset, added to the voice oscillator's stride on its next advance.
    pub phase_mod: f64,
    /// Amplitude multiplier for the voice's next sample.
    pub amp_mod: f32,
}

impl Modulation {
    /// Modulation values which leave a voice unmodified.
    pub const NONE: Self = Self {
        phase_mod: 0.0,
        amp_mod: 1.0,
    };

    /// Assign the modulation values to the given oscillator.
    #[inline]
    pub fn apply(&self, oscillator: &mut Oscillator) {
        oscillator.set_modulation(self.phase_mod, self.amp_mod);
    }
}

impl Default for Modulation {
    fn default() -> Self {
        Self::NONE
    }
}

// -------------------------------------------------------------------------------------------------

/// Low frequency sine oscillator, used as modulation source for all voices of a bank.
#[derive(Debug, Clone)]
pub struct Lfo {
    oscillator: Oscillator,
    depth: f32,
    amp_modulation: AmpModulation,
}

impl Lfo {
    /// Upper bound of the modulation depth. Depths are clamped to `0..=MAX_DEPTH`.
    pub const MAX_DEPTH: f32 = 1.0;

    pub fn new(sample_rate: u32, frequency: f64, depth: f32, amp_modulation: AmpModulation) -> Self {
        let mut oscillator = Oscillator::new();
        oscillator.set_frequency(frequency, sample_rate);
        Self {
            oscillator,
            depth: Self::clamp_depth(depth),
            amp_modulation,
        }
    }

    /// Set a new rate in Hz with the given sampling rate.
    pub fn set_frequency(&mut self, frequency: f64, sample_rate: u32) {
        self.oscillator.set_frequency(frequency, sample_rate);
    }

    /// Current phase in range [0, 1).
    pub fn phase(&self) -> f64 {
        self.oscillator.phase()
    }
    /// Set or reset the LFO's phase.
    pub fn set_phase(&mut self, phase: f64) {
        self.oscillator.set_phase(phase);
    }

    /// Current modulation depth, always in range `0..=MAX_DEPTH`.
    pub fn depth(&self) -> f32 {
        self.depth
    }
    /// Set a new modulation depth. Negative and NaN depths become 0, large ones `MAX_DEPTH`.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = Self::clamp_depth(depth);
    }

    pub fn amp_modulation(&self) -> AmpModulation {
        self.amp_modulation
    }
    pub fn set_amp_modulation(&mut self, amp_modulation: AmpModulation) {
        self.amp_modulation = amp_modulation;
    }

    /// Bipolar LFO output at the current phase.
    #[inline]
    pub fn value(&self) -> f32 {
        sine(self.oscillator.phase())
    }

    /// Modulation values at the current phase, without advancing the LFO.
    #[inline]
    pub fn modulation(&self) -> Modulation {
        let value = self.value();
        Modulation {
            phase_mod: value as f64 * self.depth as f64,
            amp_mod: self.amp_modulation.gain(value, self.depth),
        }
    }

    /// Advance the LFO by one sample and return the modulation values at its new phase.
    #[inline]
    pub fn tick(&mut self) -> Modulation {
        self.oscillator.advance();
        self.modulation()
    }

    /// Advance the LFO once for each entry in the given buffer, writing the modulation values.
    pub fn process(&mut self, output: &mut [Modulation]) {
        for modulation in output.iter_mut() {
            *modulation = self.tick();
        }
    }

    fn clamp_depth(depth: f32) -> f32 {
        if depth.is_nan() {
            0.0
        } else {
            depth.clamp(0.0, Self::MAX_DEPTH)
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_is_clamped() {
        let mut lfo = Lfo::new(44100, 1.0, 5.0, AmpModulation::Bipolar);
        assert_eq!(lfo.depth(), Lfo::MAX_DEPTH);
        lfo.set_depth(-0.5);
        assert_eq!(lfo.depth(), 0.0);
        lfo.set_depth(f32::NAN);
        assert_eq!(lfo.depth(), 0.0);
        lfo.set_depth(0.01);
        assert_eq!(lfo.depth(), 0.01);
    }

    #[test]
    fn modulation_formula() {
        let mut lfo = Lfo::new(44100, 0.0, 0.5, AmpModulation::Bipolar);
        lfo.set_phase(0.25);
        let modulation = lfo.modulation();
        assert!((modulation.phase_mod - 0.5).abs() < 1e-6);
        assert!((modulation.amp_mod - 1.5).abs() < 1e-6);

        lfo.set_phase(0.75);
        let modulation = lfo.modulation();
        assert!((modulation.phase_mod + 0.5).abs() < 1e-6);
        assert!((modulation.amp_mod - 0.5).abs() < 1e-6);

        lfo.set_amp_modulation(AmpModulation::Unipolar);
        assert!((lfo.modulation().amp_mod - 1.0).abs() < 1e-6);
        lfo.set_phase(0.25);
        assert!((lfo.modulation().amp_mod - 1.5).abs() < 1e-6);

        lfo.set_amp_modulation(AmpModulation::Off);
        assert_eq!(lfo.modulation().amp_mod, 1.0);
    }

    #[test]
    fn zero_depth_is_neutral() {
        let mut lfo = Lfo::new(44100, 3.0, 0.0, AmpModulation::Bipolar);
        for _ in 0..1000 {
            let modulation = lfo.tick();
            assert_eq!(modulation.phase_mod, 0.0);
            assert_eq!(modulation.amp_mod, 1.0);
        }
    }

    #[test]
    fn process_advances_once_per_entry() {
        let mut lfo = Lfo::new(100, 1.0, 0.1, AmpModulation::Bipolar);
        let mut output = vec![Modulation::NONE; 25];
        lfo.process(&mut output);
        assert!((lfo.phase() - 0.25).abs() < 1e-9);
        // the last entry is the value at a quarter period
        assert!((output[24].phase_mod - 0.1).abs() < 1e-6);
    }

    #[test]
    fn apply_to_oscillator() {
        let mut osc = Oscillator::new();
        let modulation = Modulation {
            phase_mod: 0.125,
            amp_mod: 0.5,
        };
        modulation.apply(&mut osc);
        assert_eq!(osc.phase_mod(), 0.125);
        assert_eq!(osc.amp_mod(), 0.5);
        osc.advance();
        assert_eq!(osc.phase(), 0.125);
    }
}
