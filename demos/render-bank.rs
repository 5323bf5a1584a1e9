//! Renders a control sweep of the oscillator bank into a wav file, without using an audio
//! device, and plots the last rendered buffer as SVG file.

use std::path::PathBuf;

use svg::{
    node::element::{path::Data, Path},
    Document,
};

use gsynth::{
    outputs::WavSink, waveform::waveform_from_buffer, BufferScheduler, ControlPosition, Error,
};

// -------------------------------------------------------------------------------------------------

// Common demo code
#[path = "./common/arguments.rs"]
mod arguments;

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Error> {
    let args = arguments::parse();
    let config = args.synth_config();

    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("demos/render-bank.wav"));
    let max_samples = (args.duration() * config.sample_rate as f32) as u64;
    let total_buffers = max_samples.div_ceil(config.block_size as u64).max(1);

    let mut sink = WavSink::open(
        &output_path,
        config.sample_rate,
        config.block_size,
        Some(max_samples),
    )?;
    let mut scheduler = BufferScheduler::for_sink(config, &sink)?;

    // sweep from the lower left to the upper right corner of the control surface
    while !sink.is_finished() {
        let progress = scheduler.stats().rendered_buffers as f32 / total_buffers as f32;
        let control = ControlPosition::new(progress, progress);
        scheduler.step(&mut sink, &control)?;
    }
    println!(
        "Rendered {} buffers into '{}'",
        scheduler.stats().rendered_buffers,
        output_path.display()
    );
    log::debug!("final telemetry: {:?}", scheduler.telemetry());

    write_waveform_svg(
        scheduler.buffer(),
        scheduler.bank().config().sample_rate,
        &output_path.with_extension("svg"),
    )
    .map_err(Error::IoError)
}

fn write_waveform_svg(
    buffer: &[f32],
    sample_rate: u32,
    path: &std::path::Path,
) -> Result<(), std::io::Error> {
    // resolution of the resulting SVG
    const WIDTH: usize = 1024;
    const HEIGHT: usize = 256;
    const STROKE_WIDTH: usize = 1;

    let waveform_data = waveform_from_buffer(buffer, sample_rate, WIDTH);
    if waveform_data.is_empty() {
        return Ok(());
    }

    // fit points into our viewBox
    let num_points = waveform_data.len();
    let width = WIDTH as f32;
    let height = HEIGHT as f32;

    let scale_x = move |v| v as f32 * width / num_points as f32;
    let scale_y = move |v| (v + 1.0) * height / 2.0;

    // create path from waveform points
    let mut data = Data::new().move_to((scale_x(0), scale_y(waveform_data[0].min)));
    for (index, point) in waveform_data.iter().enumerate() {
        let x = scale_x(index);
        data = data
            .line_to((x, scale_y(point.min)))
            .line_to((x, scale_y(point.max)));
    }
    let path_element = Path::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", STROKE_WIDTH)
        .set("d", data);

    let document = Document::new()
        .set("viewBox", (0, 0, WIDTH, HEIGHT))
        .add(path_element);
    svg::save(path, &document)?;
    println!("Saved waveform plot to '{}'", path.display());
    Ok(())
}
