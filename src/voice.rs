use crate::{
    modulation::{Lfo, Modulation},
    oscillator::{Oscillator, Waveform},
    utils::{
        clip::{soft_clip, ClipMode},
        smoothed::{ExponentialSmoothedValue, SmoothedValue},
    },
};

// -------------------------------------------------------------------------------------------------

/// Modulation source for a single voice render pass.
pub enum VoiceModulation<'a> {
    /// Tick the shared LFO once per sample of this voice.
    Shared(&'a mut Lfo),
    /// Read modulation values which got rendered for the whole buffer beforehand.
    /// Only the part of the buffer which is covered by these values gets rendered.
    Precomputed(&'a [Modulation]),
}

// -------------------------------------------------------------------------------------------------

/// A single oscillator bank voice: an oscillator with a smoothed frequency and a fixed mix
/// amplitude, which accumulates its modulated output into a shared buffer.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    frequency: ExponentialSmoothedValue,
    amplitude: f32,
}

impl Voice {
    /// Create a new silent voice with the given mix amplitude and frequency smoothing factor
    /// in range (0, 1].
    pub fn new(amplitude: f32, smoothing_factor: f32) -> Self {
        Self {
            oscillator: Oscillator::new(),
            frequency: ExponentialSmoothedValue::with_inertia(0.0, smoothing_factor),
            amplitude,
        }
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }
    pub fn oscillator_mut(&mut self) -> &mut Oscillator {
        &mut self.oscillator
    }

    /// Mix amplitude of the voice.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Current, smoothed frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency.current()
    }
    /// Frequency the voice is gliding to.
    pub fn target_frequency(&self) -> f32 {
        self.frequency.target()
    }

    /// Set a new target frequency. Applied with the next `update_frequency` call.
    pub fn set_target_frequency(&mut self, frequency: f32) {
        self.frequency.set_target(frequency);
    }

    /// Jump to the given frequency without smoothing.
    pub fn init_frequency(&mut self, frequency: f32, sample_rate: u32) {
        self.frequency.init(frequency);
        self.oscillator
            .set_frequency(self.frequency.current() as f64, sample_rate);
    }

    /// Move the smoothed frequency one step towards its target and update the oscillator's
    /// stride. Called once per buffer: the stride stays constant within a buffer.
    pub fn update_frequency(&mut self, sample_rate: u32) {
        let frequency = self.frequency.next();
        self.oscillator.set_frequency(frequency as f64, sample_rate);
    }

    /// Render the voice's modulated waveform and add it into the given buffer.
    ///
    /// With [`ClipMode::Soft`], each accumulated sample gets saturated right away, so the order
    /// in which voices get rendered into a buffer is audible. [`ClipMode::Hard`] only accumulates:
    /// clamping the final sum is up to the caller.
    pub fn render(
        &mut self,
        buffer: &mut [f32],
        waveform: Waveform,
        modulation: VoiceModulation,
        clip_mode: ClipMode,
    ) {
        match modulation {
            VoiceModulation::Shared(lfo) => {
                for sample in buffer.iter_mut() {
                    self.render_sample(sample, waveform, lfo.tick(), clip_mode);
                }
            }
            VoiceModulation::Precomputed(values) => {
                for (sample, values) in buffer.iter_mut().zip(values) {
                    self.render_sample(sample, waveform, *values, clip_mode);
                }
            }
        }
    }

    #[inline(always)]
    fn render_sample(
        &mut self,
        sample: &mut f32,
        waveform: Waveform,
        modulation: Modulation,
        clip_mode: ClipMode,
    ) {
        modulation.apply(&mut self.oscillator);
        self.oscillator.advance();
        *sample += self.oscillator.value(waveform) * self.amplitude * self.oscillator.amp_mod();
        if clip_mode == ClipMode::Soft {
            *sample = soft_clip(*sample);
        }
    }
}

// -------------------------------------------------------------------------------------------------
