#[cfg(feature = "cpal-output")]
pub mod cpal;
#[cfg(feature = "wav-output")]
pub mod wav;

use crate::error::Error;

// -------------------------------------------------------------------------------------------------

/// Available audio hosts for cpal output (platform specific)
#[cfg(feature = "cpal-output")]
pub enum AudioHostId {
    Default, // system default
    #[cfg(target_os = "linux")]
    Alsa,
    #[cfg(target_os = "linux")]
    Jack,
}

// -------------------------------------------------------------------------------------------------

/// Consumer of rendered mono buffers with a fixed sample rate and block size.
///
/// Sinks signal backpressure via [`PlaybackSink::is_ready_for_next_buffer`]: a scheduler only
/// renders and submits a new buffer when the sink consumed the previously submitted one.
pub trait PlaybackSink {
    /// Sample rate the sink plays back submitted buffers with.
    fn sample_rate(&self) -> u32;
    /// Number of samples per submitted buffer.
    fn block_size(&self) -> usize;

    /// true when the previously submitted buffer got consumed and a new one can be submitted.
    fn is_ready_for_next_buffer(&self) -> bool;
    /// Hand over a rendered buffer. The buffer is copied, so the caller may reuse it right away.
    fn submit(&mut self, buffer: &[f32]) -> Result<(), Error>;

    /// Stop playback and release the underlying device or file.
    fn close(&mut self);
}
