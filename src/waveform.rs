//! Helper functions to condense rendered buffers into waveform plot data.
//!
//! ## Examples
//!
//! Write the waveform of a rendered buffer as SVG file.
//!
//! ```rust
//! use svg::{node::element::{path::Data, Path}, Document};
//! use gsynth::waveform::waveform_from_buffer;
//!
//! # fn main() { || -> Result<(), Box<dyn std::error::Error>> { // only check if it compiles
//! #
//! // resolution/viewBox of the resulting SVG
//! const WIDTH: usize = 512;
//! const HEIGHT: usize = 256;
//!
//! let buffer = (0..1024)
//!     .map(|i| (i as f32 / 64.0).sin())
//!     .collect::<Vec<_>>();
//! let waveform_data = waveform_from_buffer(&buffer, 44100, WIDTH);
//!
//! // fit waveform points into our viewBox
//! let num_points = waveform_data.len();
//! let scale_x = move |v| v as f32 * WIDTH as f32 / num_points as f32;
//! let scale_y = move |v| (v + 1.0) * HEIGHT as f32 / 2.0;
//!
//! let mut data = Data::new().move_to((scale_x(0), scale_y(waveform_data[0].min)));
//! for (index, point) in waveform_data.iter().enumerate() {
//!     let x = scale_x(index);
//!     data = data
//!         .line_to((x, scale_y(point.min)))
//!         .line_to((x, scale_y(point.max)));
//! }
//! let path = Path::new()
//!     .set("fill", "none")
//!     .set("stroke", "black")
//!     .set("d", data);
//!
//! let document = Document::new()
//!     .set("viewBox", (0, 0, WIDTH, HEIGHT))
//!     .add(path);
//! svg::save("SOME_WAVEFORM.svg", &document)?;
//! #
//! # Ok(()) }; }
//! ```

use std::time::Duration;

// -------------------------------------------------------------------------------------------------

/// A single point in a waveform view plot, which represents a condensed view of the audio data at
/// the specified time as min/max values.
/// The slice width is indirectly specified via the resolution parameter when generating the points.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WaveformPoint {
    /// Start time this point refers to in the original sample buffer.
    pub time: Duration,
    /// The minimum of all values which are represented by this time slice.
    pub min: f32,
    /// The maximum of all values which are represented by this time slice.
    pub max: f32,
}

// -------------------------------------------------------------------------------------------------

/// Generates display data for waveform plots with the given resolution from the given mono
/// sample buffer.
///
/// Resolution usually is the width in pixels that you want to draw the waveform into. When the
/// buffer has fewer samples than the resolution, one point per sample is returned and the
/// waveform must be drawn upscaled. Otherwise exactly `resolution` points are returned, each
/// covering a slice of samples.
pub fn waveform_from_buffer(
    buffer: &[f32],
    sample_rate: u32,
    resolution: usize,
) -> Vec<WaveformPoint> {
    let sample_time =
        |index: usize| Duration::from_secs_f64(index as f64 / sample_rate.max(1) as f64);

    // upscale
    if buffer.len() <= resolution {
        buffer
            .iter()
            .enumerate()
            .map(|(index, value)| WaveformPoint {
                time: sample_time(index),
                min: *value,
                max: *value,
            })
            .collect()
    }
    // downscale
    else {
        let step_size = buffer.len() as f64 / resolution as f64;
        (0..resolution)
            .map(|index| {
                let slice_start = (index as f64 * step_size) as usize;
                let slice_end = (((index + 1) as f64 * step_size) as usize).min(buffer.len());
                let slice = &buffer[slice_start..slice_end];
                let (min, max) = slice
                    .iter()
                    .fold((f32::MAX, f32::MIN), |(min, max), v| (min.min(*v), max.max(*v)));
                WaveformPoint {
                    time: sample_time(slice_start),
                    min,
                    max,
                }
            })
            .collect()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform() {
        let buffer = (0..1024)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect::<Vec<f32>>();

        // downscale
        let downscaled = waveform_from_buffer(&buffer, 44100, 256);
        assert_eq!(downscaled.len(), 256);
        assert!(downscaled.iter().all(|p| p.min == -0.5 && p.max == 0.5));
        assert_eq!(downscaled[1].time, Duration::from_secs_f64(4.0 / 44100.0));

        // upscale
        let upscaled = waveform_from_buffer(&buffer, 44100, 2048);
        assert_eq!(upscaled.len(), 1024);
        assert_eq!(upscaled[1].min, -0.5);
        assert_eq!(upscaled[1].max, -0.5);

        // empty
        assert!(waveform_from_buffer(&[], 44100, 128).is_empty());
    }
}
