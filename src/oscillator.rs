//! Phase accumulator oscillators (NCOs) and their waveform evaluators.

use std::f64::consts::TAU;

use strum::{Display, EnumString, VariantNames};

// -------------------------------------------------------------------------------------------------

/// Waveform types for oscillator bank voices.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
}

impl Waveform {
    /// Evaluate the waveform at the given normalized phase. Phases outside of [0, 1) get wrapped,
    /// so all waveforms are periodic with period 1.
    #[inline]
    pub fn evaluate(self, phase: f64) -> f32 {
        match self {
            Waveform::Sine => sine(phase),
            Waveform::Saw => saw(phase),
            Waveform::Square => square(phase),
            Waveform::Triangle => triangle(phase),
        }
    }
}

/// `sin(2π·phase)`.
#[inline]
pub fn sine(phase: f64) -> f32 {
    (TAU * wrap_phase(phase)).sin() as f32
}

/// Rising, non bandlimited sawtooth in range [0, 1).
#[inline]
pub fn saw(phase: f64) -> f32 {
    let value = wrap_phase(phase) as f32;
    // phases just below 1 round up to 1 in f32
    if value >= 1.0 {
        0.0
    } else {
        value
    }
}

/// +1 in the positive half of the sine, else -1.
#[inline]
pub fn square(phase: f64) -> f32 {
    if sine(phase) > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Continuous ±1 triangle, peaking at phase 0.25 and 0.75.
#[inline]
pub fn triangle(phase: f64) -> f32 {
    let phase = wrap_phase(phase);
    // phase 0 has a zero sine: it belongs to the rising half, else the wave jumps to 2 there
    if sine(phase) >= 0.0 {
        (1.0 - 4.0 * (phase - 0.25).abs()) as f32
    } else {
        (-1.0 + 4.0 * (phase - 0.75).abs()) as f32
    }
}

/// Wrap the given phase into [0, 1), regardless of how far it is out of range.
/// Non finite phases (NaN, Inf) are reset to 0.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase - phase.floor();
    // tiny negative phases round up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

// -------------------------------------------------------------------------------------------------

/// Numerically controlled oscillator: advances a normalized phase by a fixed stride per sample.
///
/// Besides the stride, a transient phase offset and amplitude multiplier can be applied for the
/// next sample, which is how voices receive their LFO modulation.
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f64,
    phase_stride: f64,
    phase_mod: f64,
    amp_mod: f32,
}

impl Oscillator {
    /// Create a new oscillator with phase and stride set to 0.
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            phase_stride: 0.0,
            phase_mod: 0.0,
            amp_mod: 1.0,
        }
    }

    /// Current phase in range [0, 1).
    #[inline(always)]
    pub fn phase(&self) -> f64 {
        self.phase
    }
    /// Set or reset the phase. Wrapped into [0, 1).
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(phase);
    }

    /// Phase increment per sample.
    #[inline(always)]
    pub fn phase_stride(&self) -> f64 {
        self.phase_stride
    }
    /// Set the phase increment per sample directly.
    pub fn set_phase_stride(&mut self, phase_stride: f64) {
        self.phase_stride = phase_stride;
    }

    /// Set a new frequency in Hz with the given sampling rate.
    /// A zero sample rate results in a zero stride.
    pub fn set_frequency(&mut self, frequency: f64, sample_rate: u32) {
        debug_assert!(sample_rate > 0, "Invalid sample rate");
        self.phase_stride = if sample_rate > 0 {
            frequency / sample_rate as f64
        } else {
            0.0
        };
    }

    /// Transient phase offset, applied on the next `advance` call.
    #[inline(always)]
    pub fn phase_mod(&self) -> f64 {
        self.phase_mod
    }
    /// Transient amplitude multiplier for the current sample.
    #[inline(always)]
    pub fn amp_mod(&self) -> f32 {
        self.amp_mod
    }
    /// Set phase and amplitude modulation values for the next sample.
    #[inline]
    pub fn set_modulation(&mut self, phase_mod: f64, amp_mod: f32) {
        self.phase_mod = phase_mod;
        self.amp_mod = amp_mod;
    }

    /// Move the phase forward by stride and phase modulation, wrapping it into [0, 1).
    #[inline]
    pub fn advance(&mut self) {
        self.phase = wrap_phase(self.phase + self.phase_stride + self.phase_mod);
    }

    /// Evaluate the given waveform at the current phase, without modifying the phase.
    #[inline]
    pub fn value(&self, waveform: Waveform) -> f32 {
        waveform.evaluate(self.phase)
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    const ALL_WAVEFORMS: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Saw,
        Waveform::Square,
        Waveform::Triangle,
    ];

    #[test]
    fn advance_wraps_phase() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let mut osc = Oscillator::new();
        for _ in 0..10000 {
            osc.set_phase(rng.random_range(-100.0..100.0));
            osc.set_phase_stride(rng.random_range(-50.0..50.0));
            osc.set_modulation(rng.random_range(-50.0..50.0), 1.0);
            osc.advance();
            assert!(
                (0.0..1.0).contains(&osc.phase()),
                "phase {} out of range",
                osc.phase()
            );
        }

        // literal wrap cases
        let mut osc = Oscillator::new();
        osc.set_phase_stride(0.75);
        osc.advance();
        osc.advance();
        assert!((osc.phase() - 0.5).abs() < 1e-12);
        osc.set_phase_stride(-0.75);
        osc.advance();
        assert!((osc.phase() - 0.75).abs() < 1e-12);

        // tiny negative steps must not produce exactly 1.0
        let mut osc = Oscillator::new();
        osc.set_phase_stride(-1e-20);
        osc.advance();
        assert!(osc.phase() < 1.0);
    }

    #[test]
    fn advance_recovers_from_numeric_faults() {
        let mut osc = Oscillator::new();
        osc.set_phase_stride(f64::NAN);
        osc.advance();
        assert_eq!(osc.phase(), 0.0);

        osc.set_phase_stride(0.0);
        osc.set_modulation(f64::INFINITY, 1.0);
        osc.advance();
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn set_frequency() {
        let mut osc = Oscillator::new();
        osc.set_frequency(441.0, 44100);
        assert!((osc.phase_stride() - 0.01).abs() < 1e-12);
        osc.set_frequency(0.0, 48000);
        assert_eq!(osc.phase_stride(), 0.0);
    }

    #[test]
    fn waveforms_are_periodic() {
        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
        for _ in 0..2000 {
            let phase = rng.random_range(-10.0..10.0);
            for waveform in ALL_WAVEFORMS {
                let a = waveform.evaluate(phase);
                let b = waveform.evaluate(phase + 1.0);
                assert!(
                    (a - b).abs() < 1e-5,
                    "{waveform} is not periodic at {phase}: {a} != {b}"
                );
            }
        }
    }

    #[test]
    fn waveforms_are_bounded() {
        let mut phases = vec![0.0, 0.25, 0.5, 0.75, 1.0 - f64::EPSILON];
        let mut rng = SmallRng::seed_from_u64(42);
        phases.extend((0..2000).map(|_| rng.random_range(-4.0..4.0)));
        for phase in phases {
            for waveform in [Waveform::Square, Waveform::Triangle, Waveform::Sine] {
                let value = waveform.evaluate(phase);
                assert!((-1.0..=1.0).contains(&value), "{waveform} at {phase}: {value}");
            }
            assert!((0.0..1.0).contains(&Waveform::Saw.evaluate(phase)));
        }
    }

    #[test]
    fn saw_stays_below_one() {
        assert_eq!(saw(1.0 - f64::EPSILON), 0.0);
        assert_eq!(saw(-1e-12), 0.0);
        // an oscillator stepping backwards from phase 0 lands just below 1
        let mut osc = Oscillator::new();
        osc.set_phase_stride(-1e-12);
        osc.advance();
        assert!(osc.phase() < 1.0);
        assert!((0.0..1.0).contains(&osc.value(Waveform::Saw)));
    }

    #[test]
    fn waveform_values() {
        for phase in [0.0, 0.1, 0.25, 0.4, 0.6, 0.75, 0.9] {
            let expected = (2.0 * std::f64::consts::PI * phase).sin() as f32;
            assert!((sine(phase) - expected).abs() < 1e-6);
        }
        assert!((triangle(0.0)).abs() < 1e-6);
        assert!((triangle(0.25) - 1.0).abs() < 1e-6);
        assert!((triangle(0.5)).abs() < 1e-6);
        assert!((triangle(0.75) + 1.0).abs() < 1e-6);
        assert_eq!(square(0.25), 1.0);
        assert_eq!(square(0.75), -1.0);
        assert!((saw(0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn evaluation_does_not_mutate() {
        let mut osc = Oscillator::new();
        osc.set_phase(0.3);
        for waveform in ALL_WAVEFORMS {
            let _ = osc.value(waveform);
        }
        assert_eq!(osc.phase(), 0.3);
    }

    #[test]
    fn waveform_from_string() {
        assert_eq!("triangle".parse::<Waveform>().ok(), Some(Waveform::Triangle));
        assert_eq!(Waveform::Saw.to_string(), "saw");
        assert!("noise".parse::<Waveform>().is_err());
    }
}
