// -------------------------------------------------------------------------------------------------

/// Observational scalar values, which accompany a rendered buffer for display.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Telemetry {
    /// Target frequency in Hz of the last voice in the bank.
    pub frequency: f32,
    /// Base frequency in Hz of the last voice in the bank, before index scaling.
    pub base_frequency: f32,
    /// Effective, clamped LFO modulation depth.
    pub modulation_depth: f32,
    /// Number of buffers rendered and submitted to the sink so far.
    pub rendered_buffers: u64,
    /// Number of scheduler steps which found the sink busy.
    pub stalled_polls: u64,
}

// -------------------------------------------------------------------------------------------------

/// Visualizes rendered buffers, e.g. by plotting amplitude over sample index.
///
/// Presenters are purely observational: they only get read access to the buffer and can not
/// feed anything back into the oscillator bank.
pub trait VisualPresenter {
    fn present(&mut self, buffer: &[f32], telemetry: &Telemetry);
}
