use crate::{
    bank::VoiceBank,
    config::SynthConfig,
    control::{ControlPosition, ControlSource},
    error::Error,
    output::PlaybackSink,
    presenter::{Telemetry, VisualPresenter},
};

// -------------------------------------------------------------------------------------------------

/// State of a [`BufferScheduler`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the sink to consume the previously submitted buffer.
    #[default]
    Idle,
    /// Producing exactly one buffer.
    Rendering,
}

/// Counters of a [`BufferScheduler`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Number of buffers which got rendered and submitted.
    pub rendered_buffers: u64,
    /// Number of steps which found the sink busy and thus did not render anything.
    pub stalled_polls: u64,
}

// -------------------------------------------------------------------------------------------------

/// Cooperative driver of a [`VoiceBank`], which renders one buffer whenever the playback sink
/// is ready for it.
///
/// The scheduler owns no thread or timer: call [`BufferScheduler::step`] once per iteration of
/// the application's control loop. Steps never block. When the sink is busy nothing gets
/// rendered, so the scheduler never runs ahead of the sink.
#[derive(Debug)]
pub struct BufferScheduler {
    bank: VoiceBank,
    buffer: Vec<f32>,
    state: SchedulerState,
    stats: SchedulerStats,
    position: ControlPosition,
}

impl BufferScheduler {
    /// Create a new scheduler with a voice bank for the given config.
    pub fn new(config: SynthConfig) -> Result<Self, Error> {
        Ok(Self::with_bank(VoiceBank::new(config)?))
    }

    /// Create a new scheduler for the given sink, adopting the sink's sample rate and block
    /// size into the given config.
    pub fn for_sink(config: SynthConfig, sink: &impl PlaybackSink) -> Result<Self, Error> {
        Self::new(
            config
                .sample_rate(sink.sample_rate())
                .block_size(sink.block_size()),
        )
    }

    /// Create a new scheduler which drives the given bank.
    pub fn with_bank(bank: VoiceBank) -> Self {
        let buffer = vec![0.0; bank.config().block_size];
        Self {
            bank,
            buffer,
            state: SchedulerState::Idle,
            stats: SchedulerStats::default(),
            position: ControlPosition::default(),
        }
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }
    pub fn bank_mut(&mut self) -> &mut VoiceBank {
        &mut self.bank
    }

    /// The most recently rendered buffer. All zero until the first buffer got rendered.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Control position of the last step.
    pub fn position(&self) -> ControlPosition {
        self.position
    }

    /// Telemetry of the bank, including the scheduler's counters.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            rendered_buffers: self.stats.rendered_buffers,
            stalled_polls: self.stats.stalled_polls,
            ..self.bank.telemetry()
        }
    }

    /// Poll the control source and, when the sink is ready, render and submit the next buffer.
    ///
    /// Returns `Ok(true)` when a buffer got submitted, `Ok(false)` when the sink was busy.
    /// Errors from the sink's submit are passed through. The scheduler is idle again after
    /// every step, also on errors.
    pub fn step(
        &mut self,
        sink: &mut impl PlaybackSink,
        control: &impl ControlSource,
    ) -> Result<bool, Error> {
        debug_assert_eq!(self.state, SchedulerState::Idle);
        self.position = control.position();

        if !sink.is_ready_for_next_buffer() {
            self.stats.stalled_polls += 1;
            log::trace!(
                "playback sink is busy, stalled {} times",
                self.stats.stalled_polls
            );
            return Ok(false);
        }
        debug_assert_eq!(
            sink.block_size(),
            self.buffer.len(),
            "Sink and scheduler block sizes differ"
        );

        self.state = SchedulerState::Rendering;
        self.bank.update_frequencies(self.position);
        self.bank.render(&mut self.buffer);
        let result = sink.submit(&self.buffer);
        self.state = SchedulerState::Idle;

        result?;
        self.stats.rendered_buffers += 1;
        Ok(true)
    }

    /// Hand the most recently rendered buffer and the current telemetry to the given presenter.
    pub fn present(&self, presenter: &mut impl VisualPresenter) {
        presenter.present(&self.buffer, &self.telemetry());
    }
}

// -------------------------------------------------------------------------------------------------
