use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[cfg(feature = "assert-allocs")]
use assert_no_alloc::*;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::{
    error::Error,
    output::{AudioHostId, PlaybackSink},
    utils::buffer::mono_to_interleaved,
};

// -------------------------------------------------------------------------------------------------

const PREFERRED_SAMPLE_FORMAT: cpal::SampleFormat = cpal::SampleFormat::F32;

/// Max number of consumed buffers which wait for being reused by the sink.
const RECYCLED_BUFFER_COUNT: usize = 4;

// -------------------------------------------------------------------------------------------------

/// Playback sink which streams submitted mono buffers to an audio device via cpal.
///
/// The device callback runs in cpal's audio thread. Submitted buffers get queued one at a time:
/// the sink is ready for the next buffer as soon as the callback started playing the previous
/// one. Consumed buffers are sent back for reuse, so the audio thread neither allocates nor
/// frees memory.
pub struct CpalSink {
    stream: Option<cpal::Stream>,
    channel_count: usize,
    sample_rate: u32,
    block_size: usize,
    buffer_send: Sender<Vec<f32>>,
    recycle_recv: Receiver<Vec<f32>>,
    underruns: Arc<AtomicU64>,
    playback_pos: Arc<AtomicU64>,
}

impl CpalSink {
    /// Open the default output device of the default audio host.
    pub fn open(sample_rate: u32, block_size: usize) -> Result<Self, Error> {
        Self::open_with_host(AudioHostId::Default, sample_rate, block_size)
    }

    /// Open the default output device of the given audio host, preferably running at the given
    /// sample rate. When the device doesn't support the sample rate, its default rate is used:
    /// check [`PlaybackSink::sample_rate`] for the actual rate.
    pub fn open_with_host(
        hostid: AudioHostId,
        sample_rate: u32,
        block_size: usize,
    ) -> Result<Self, Error> {
        if block_size == 0 {
            return Err(Error::ParameterError(
                "sink 'block_size' must be > 0".to_string(),
            ));
        }
        let host = match hostid {
            AudioHostId::Default => cpal::default_host(),
            #[cfg(target_os = "linux")]
            AudioHostId::Alsa => cpal::host_from_id(cpal::HostId::Alsa)?,
            #[cfg(target_os = "linux")]
            AudioHostId::Jack => cpal::host_from_id(cpal::HostId::Jack)?,
        };

        // Open the default output device.
        let device = host
            .default_output_device()
            .ok_or(cpal::DefaultStreamConfigError::DeviceNotAvailable)?;

        if let Ok(name) = device.name() {
            log::info!("using audio device: {}", name);
        }

        let supported = Self::preferred_output_config(&device, sample_rate)?;
        let config = cpal::StreamConfig {
            buffer_size: cpal::BufferSize::Default,
            ..supported.config()
        };
        let channel_count = config.channels as usize;
        let sample_rate = config.sample_rate.0;

        let (buffer_send, buffer_recv) = bounded(1);
        let (recycle_send, recycle_recv) = bounded(RECYCLED_BUFFER_COUNT);
        let underruns = Arc::new(AtomicU64::new(0));
        let playback_pos = Arc::new(AtomicU64::new(0));

        let mut callback = StreamCallback {
            buffer_recv,
            recycle_send,
            current: None,
            position: 0,
            channel_count,
            started: false,
            underruns: Arc::clone(&underruns),
            playback_pos: Arc::clone(&playback_pos),
        };

        log::info!("opening output stream: {:?}", config);
        let stream = device.build_output_stream(
            &config,
            move |output: &mut [f32], _: &cpal::OutputCallbackInfo| {
                #[cfg(not(feature = "assert-allocs"))]
                callback.write_samples(output);
                #[cfg(feature = "assert-allocs")]
                assert_no_alloc(|| callback.write_samples(output));
            },
            |err| {
                log::error!("audio output error: {}", err);
            },
            None,
        )?;
        stream.play()?;

        Ok(Self {
            stream: Some(stream),
            channel_count,
            sample_rate,
            block_size,
            buffer_send,
            recycle_recv,
            underruns,
            playback_pos,
        })
    }

    /// Actual device's output channel count. Mono buffers get duplicated into all channels.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Actual device's output playhead position in mono samples.
    pub fn sample_position(&self) -> u64 {
        self.playback_pos.load(Ordering::Relaxed)
    }

    /// Number of device callbacks which ran out of submitted samples after playback started.
    pub fn underrun_count(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    fn preferred_output_config(
        device: &cpal::Device,
        sample_rate: u32,
    ) -> Result<cpal::SupportedStreamConfig, Error> {
        let preferred_rate = cpal::SampleRate(sample_rate);
        let mut candidates = device
            .supported_output_configs()?
            .filter(|s| {
                s.sample_format() == PREFERRED_SAMPLE_FORMAT
                    && (s.min_sample_rate()..=s.max_sample_rate()).contains(&preferred_rate)
            })
            .collect::<Vec<_>>();
        // prefer the smallest channel layout: mono ideally
        candidates.sort_by_key(|s| s.channels());
        if let Some(supported) = candidates.into_iter().next() {
            return Ok(supported.with_sample_rate(preferred_rate));
        }

        let default = device.default_output_config()?;
        if default.sample_format() != PREFERRED_SAMPLE_FORMAT {
            return Err(Error::OutputDeviceError(
                format!(
                    "unsupported device sample format: {}",
                    default.sample_format()
                )
                .into(),
            ));
        }
        log::warn!(
            "audio device does not support {} Hz, using {} Hz instead",
            sample_rate,
            default.sample_rate().0
        );
        Ok(default)
    }
}

impl PlaybackSink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn is_ready_for_next_buffer(&self) -> bool {
        self.stream.is_some() && self.buffer_send.is_empty()
    }

    fn submit(&mut self, buffer: &[f32]) -> Result<(), Error> {
        if self.stream.is_none() {
            return Err(Error::SinkClosed);
        }
        let mut block = self
            .recycle_recv
            .try_recv()
            .unwrap_or_else(|_| Vec::with_capacity(buffer.len()));
        block.clear();
        block.extend_from_slice(buffer);
        self.buffer_send
            .try_send(block)
            .map_err(|err| Error::OutputDeviceError(Box::new(err)))
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            log::debug!("closing audio output stream");
            if let Err(err) = stream.pause() {
                log::error!("failed to stop stream: {}", err);
            }
        }
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.close();
    }
}

// -------------------------------------------------------------------------------------------------

struct StreamCallback {
    buffer_recv: Receiver<Vec<f32>>,
    recycle_send: Sender<Vec<f32>>,
    current: Option<Vec<f32>>,
    position: usize,
    channel_count: usize,
    started: bool,
    underruns: Arc<AtomicU64>,
    playback_pos: Arc<AtomicU64>,
}

impl StreamCallback {
    fn write_samples(&mut self, output: &mut [f32]) {
        let mut output = output;
        while !output.is_empty() {
            // Fetch the next submitted buffer when the current one got consumed.
            let current_len = self.current.as_ref().map_or(0, |current| current.len());
            if self.position >= current_len {
                if let Some(consumed) = self.current.take() {
                    // a full recycle queue drops the buffer here, which should never happen
                    let _ = self.recycle_send.try_send(consumed);
                }
                match self.buffer_recv.try_recv() {
                    Ok(next) => {
                        self.current = Some(next);
                        self.position = 0;
                        self.started = true;
                        continue;
                    }
                    Err(_) => {
                        if self.started {
                            self.underruns.fetch_add(1, Ordering::Relaxed);
                        }
                        break;
                    }
                }
            }

            // Write out as many samples as possible from the current buffer.
            if let Some(current) = &self.current {
                let written =
                    mono_to_interleaved(&current[self.position..], output, self.channel_count);
                self.position += written;
                self.playback_pos
                    .fetch_add(written as u64, Ordering::Relaxed);
                let remaining = std::mem::take(&mut output);
                output = &mut remaining[written * self.channel_count..];
                if written == 0 {
                    // output is smaller than a single frame
                    break;
                }
            }
        }

        // Mute any remaining samples.
        output.iter_mut().for_each(|s| *s = 0.0);
    }
}

// -------------------------------------------------------------------------------------------------

impl From<cpal::HostUnavailable> for Error {
    fn from(err: cpal::HostUnavailable) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

impl From<cpal::DefaultStreamConfigError> for Error {
    fn from(err: cpal::DefaultStreamConfigError) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

impl From<cpal::SupportedStreamConfigsError> for Error {
    fn from(err: cpal::SupportedStreamConfigsError) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

impl From<cpal::BuildStreamError> for Error {
    fn from(err: cpal::BuildStreamError) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

impl From<cpal::PlayStreamError> for Error {
    fn from(err: cpal::PlayStreamError) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

impl From<cpal::PauseStreamError> for Error {
    fn from(err: cpal::PauseStreamError) -> Error {
        Error::OutputDeviceError(Box::new(err))
    }
}

// -------------------------------------------------------------------------------------------------
