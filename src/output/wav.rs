use std::{fs::File, io::BufWriter, path::Path};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{error::Error, output::PlaybackSink};

// -------------------------------------------------------------------------------------------------

/// Playback sink, which writes buffers into a mono wav file instead of playing them back.
///
/// Wav sinks consume buffers immediately, so they are always ready for the next buffer until
/// the optional maximum length got reached or the sink got closed.
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
    sample_rate: u32,
    block_size: usize,
    max_samples: Option<u64>,
    written_samples: u64,
}

impl WavSink {
    /// Create a new wav sink with the given parameters.
    ///
    /// * `file_path`: Target file path. Should end with ".wav" extension.
    /// * `sample_rate`: Wav file's sample rate.
    /// * `block_size`: Expected number of samples per submitted buffer.
    /// * `max_samples`: Max length of the written content in samples, or None to write until the
    ///   sink gets closed.
    ///
    /// Wav files contents are always saved as 32bit floats.
    pub fn open<P: AsRef<Path>>(
        file_path: P,
        sample_rate: u32,
        block_size: usize,
        max_samples: Option<u64>,
    ) -> Result<Self, Error> {
        if sample_rate == 0 || block_size == 0 {
            return Err(Error::ParameterError(format!(
                "invalid wav sink specs: {sample_rate} Hz, {block_size} samples per block"
            )));
        }
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(file_path.as_ref(), spec)
            .map_err(|err| Error::OutputDeviceError(Box::new(err)))?;

        log::info!(
            "writing audio output into wav file '{}'",
            file_path.as_ref().display()
        );

        Ok(Self {
            writer: Some(writer),
            sample_rate,
            block_size,
            max_samples,
            written_samples: 0,
        })
    }

    /// Number of samples which got written so far.
    pub fn written_samples(&self) -> u64 {
        self.written_samples
    }

    /// true when the maximum length got reached or the sink got closed.
    pub fn is_finished(&self) -> bool {
        self.writer.is_none()
            || self
                .max_samples
                .is_some_and(|max_samples| self.written_samples >= max_samples)
    }

    fn finalize(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(err) = writer.finalize() {
                log::error!("Failed to finalize WAV file: {err}");
            } else {
                log::debug!("finalized WAV file after {} samples", self.written_samples);
            }
        }
    }
}

impl PlaybackSink for WavSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn is_ready_for_next_buffer(&self) -> bool {
        !self.is_finished()
    }

    fn submit(&mut self, buffer: &[f32]) -> Result<(), Error> {
        let remaining = match self.max_samples {
            Some(max_samples) => max_samples.saturating_sub(self.written_samples) as usize,
            None => buffer.len(),
        };
        let writer = self.writer.as_mut().ok_or(Error::SinkClosed)?;
        for sample in &buffer[..buffer.len().min(remaining)] {
            writer
                .write_sample(*sample)
                .map_err(|err| Error::OutputDeviceError(Box::new(err)))?;
        }
        self.written_samples += buffer.len().min(remaining) as u64;
        if self.is_finished() {
            self.finalize();
        }
        Ok(())
    }

    fn close(&mut self) {
        self.finalize();
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        self.finalize();
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gsynth-{}-{name}.wav", std::process::id()))
    }

    #[test]
    fn write_and_finish() {
        let path = temp_wav_path("finish");
        let mut sink = WavSink::open(&path, 8000, 16, Some(40)).unwrap();
        assert_eq!(sink.sample_rate(), 8000);
        assert_eq!(sink.block_size(), 16);

        let buffer = vec![0.25; 16];
        let mut submitted = 0;
        while sink.is_ready_for_next_buffer() {
            sink.submit(&buffer).unwrap();
            submitted += 1;
        }
        assert_eq!(submitted, 3);
        assert_eq!(sink.written_samples(), 40);
        assert!(matches!(sink.submit(&buffer), Err(Error::SinkClosed)));

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 40);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn close() {
        let path = temp_wav_path("close");
        let mut sink = WavSink::open(&path, 44100, 64, None).unwrap();
        sink.submit(&[0.0; 64]).unwrap();
        assert!(sink.is_ready_for_next_buffer());
        sink.close();
        assert!(!sink.is_ready_for_next_buffer());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_specs() {
        let path = temp_wav_path("invalid");
        assert!(WavSink::open(&path, 0, 64, None).is_err());
    }
}
