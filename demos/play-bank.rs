//! Plays the oscillator bank via the default audio device, using the mouse pointer as control
//! source: horizontal movement sweeps the voice frequencies, vertical movement sets the LFO
//! modulation depth.

use std::time::{Duration, Instant};

use device_query::{DeviceQuery, DeviceState, Keycode};

use gsynth::{
    outputs::{CpalSink, WavSink},
    BufferScheduler, ControlPosition, Error, PlaybackSink, Telemetry, VisualPresenter,
};

// -------------------------------------------------------------------------------------------------

#[cfg(all(debug_assertions, feature = "assert-allocs"))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

// -------------------------------------------------------------------------------------------------

// Common demo code
#[path = "./common/arguments.rs"]
mod arguments;

// -------------------------------------------------------------------------------------------------

/// Prints telemetry and the peak level of rendered buffers to the console.
struct ConsolePresenter {
    interval: Duration,
    last_print: Instant,
}

impl ConsolePresenter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_print: Instant::now(),
        }
    }
}

impl VisualPresenter for ConsolePresenter {
    fn present(&mut self, buffer: &[f32], telemetry: &Telemetry) {
        if self.last_print.elapsed() < self.interval {
            return;
        }
        self.last_print = Instant::now();
        let peak = buffer.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
        let meter = "#".repeat((peak * 40.0).round() as usize);
        println!(
            "freq: {:8.2} Hz  base: {:7.2} Hz  depth: {:.4}  buffers: {:6}  stalls: {:8}  |{:<40}|",
            telemetry.frequency,
            telemetry.base_frequency,
            telemetry.modulation_depth,
            telemetry.rendered_buffers,
            telemetry.stalled_polls,
            meter
        );
    }
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Error> {
    let args = arguments::parse();
    let config = args.synth_config();

    println!("*** gsynth oscillator bank demo:");
    println!("  Move the mouse horizontally to change the voice frequencies.");
    println!("  Move the mouse vertically to change the modulation depth.");
    println!("  To quit press 'Esc'.");
    println!();

    if let Some(output_path) = &args.output_path {
        let max_samples = (args.duration() * config.sample_rate as f32) as u64;
        let mut sink = WavSink::open(
            output_path,
            config.sample_rate,
            config.block_size,
            Some(max_samples),
        )?;
        let scheduler = BufferScheduler::for_sink(config, &sink)?;
        run(scheduler, &mut sink, &args, |sink| sink.is_finished())
    } else {
        let mut sink = CpalSink::open(config.sample_rate, config.block_size)?;
        let scheduler = BufferScheduler::for_sink(config, &sink)?;
        let result = run(scheduler, &mut sink, &args, |_| false);
        if sink.underrun_count() > 0 {
            log::warn!("audio device ran dry {} times", sink.underrun_count());
        }
        result
    }
}

fn run<S: PlaybackSink>(
    mut scheduler: BufferScheduler,
    sink: &mut S,
    args: &arguments::Arguments,
    is_finished: impl Fn(&S) -> bool,
) -> Result<(), Error> {
    let device_state = DeviceState::new();
    let (width, height) = args.surface_size();
    let control = || {
        let (x, y) = device_state.get_mouse().coords;
        ControlPosition::from_pointer(x as f32, y as f32, width, height)
    };

    let mut presenter = ConsolePresenter::new(Duration::from_millis(250));
    while !is_finished(sink) {
        if device_state.get_keys().contains(&Keycode::Escape) {
            println!("Shutting down...");
            break;
        }
        if scheduler.step(sink, &control)? {
            scheduler.present(&mut presenter);
        } else {
            // the sink is busy playing back: don't spin
            std::thread::sleep(Duration::from_millis(1));
        }
    }
    sink.close();
    Ok(())
}
