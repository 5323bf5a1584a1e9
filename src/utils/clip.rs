//! Waveshapers which bound mixed signals into the [-1, 1] range.

use strum::{Display, EnumString, VariantNames};

// -------------------------------------------------------------------------------------------------

/// Clipping policy applied to the mixed voice signal.
///
/// The two policies sound different: soft clipping saturates the running sum after every voice,
/// so later voices get shaped by the partial sum of earlier ones, while hard clipping only clamps
/// the final sum.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum ClipMode {
    /// Incremental `tanh` saturation after each voice's contribution.
    #[default]
    Soft,
    /// Clamp to [-1, 1] once, after all voices got summed up.
    Hard,
}

// -------------------------------------------------------------------------------------------------

/// Hyperbolic tangent saturation. Output is in [-1, 1], strictly inside for moderate input,
/// and approximately the identity for small input values.
#[inline]
pub fn soft_clip(sample: f32) -> f32 {
    sample.tanh()
}

/// Clamp to [-1, 1]. Identity within that range.
#[inline]
pub fn hard_clip(sample: f32) -> f32 {
    sample.clamp(-1.0, 1.0)
}

/// Apply [`hard_clip`] to every sample in the given buffer.
pub fn hard_clip_buffer(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = hard_clip(*sample);
    }
}

// -------------------------------------------------------------------------------------------------
