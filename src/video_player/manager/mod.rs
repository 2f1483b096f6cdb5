// SPDX-License-Identifier: MPL-2.0
//! Playback manager: the coordinator of the decode and presentation loops.
//!
//! The manager owns the demuxer, the decoder, the frame queue and the active
//! [`PlaybackStateHandler`]. It never blocks and never spawns: the host event
//! loop sleeps until [`PlaybackManager::next_deadline`] and then calls
//! [`PlaybackManager::run_due_tasks`]. Control calls and task ticks mutate the
//! manager strictly one at a time.
//!
//! # Example
//!
//! ```ignore
//! let mut manager = PlaybackManager::new(demuxer, track, decoder, |event| {
//!     println!("{event:?}");
//! });
//! manager.resume();
//! while let Some(deadline) = manager.next_deadline() {
//!     std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
//!     manager.run_due_tasks();
//! }
//! ```

mod decode;
mod present;
mod seek;

use super::events::{PlaybackEvent, PlaybackEventSink};
use super::frame_queue::{FrameQueue, FrameQueueItem};
use super::state::{PlaybackStateHandler, Request, Transition};
use super::sync::PlaybackClock;
use super::timer::ScheduledTask;
use crate::application::port::{Clock, Demuxer, SystemClock, VideoDecoder};
use crate::config::PlaybackConfig;
use crate::domain::error::{DecoderError, DemuxerError, FatalPlaybackError};
use crate::domain::media::Track;
use crate::domain::video::{DecodeInterval, PlaybackState, SampleBudget, SeekMode};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

/// Scheduling parameters of a [`PlaybackManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackSettings {
    /// Decode task period once the queue is at least half full.
    pub decode_interval: DecodeInterval,
    /// Samples a decode tick may submit without getting a picture back.
    pub sample_budget: SampleBudget,
    /// Mode used by [`PlaybackManager::seek_default`].
    pub default_seek_mode: SeekMode,
}

impl From<&PlaybackConfig> for PlaybackSettings {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            decode_interval: config.decode_interval(),
            sample_budget: config.sample_budget(),
            default_seek_mode: config.seek_mode(),
        }
    }
}

pub struct PlaybackManager {
    demuxer: Box<dyn Demuxer>,
    decoder: Box<dyn VideoDecoder>,
    track: Track,
    frame_queue: FrameQueue,
    /// Item taken from the queue whose presentation time has not come yet.
    next_frame: Option<FrameQueueItem>,
    skipped_frames: u64,
    handler: PlaybackStateHandler,
    clock: PlaybackClock,
    time_source: Box<dyn Clock>,
    decode_task: ScheduledTask,
    present_task: ScheduledTask,
    last_presented: Option<Duration>,
    /// The demuxer ran out; pictures held by the decoder are being collected.
    draining: bool,
    end_of_stream: bool,
    /// No sample has been read since the demuxer was opened or rewound.
    at_stream_start: bool,
    settings: PlaybackSettings,
    events: Box<dyn PlaybackEventSink>,
}

impl std::fmt::Debug for PlaybackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackManager")
            .field("track", &self.track)
            .field("state", &self.handler.name())
            .field("queued", &self.frame_queue.len())
            .field("skipped_frames", &self.skipped_frames)
            .field("draining", &self.draining)
            .field("end_of_stream", &self.end_of_stream)
            .finish_non_exhaustive()
    }
}

impl PlaybackManager {
    /// Creates a stopped manager for `track` of an opened demuxer.
    pub fn new(
        demuxer: impl Demuxer + 'static,
        track: Track,
        decoder: impl VideoDecoder + 'static,
        events: impl PlaybackEventSink + 'static,
    ) -> Self {
        Self {
            demuxer: Box::new(demuxer),
            decoder: Box::new(decoder),
            track,
            frame_queue: FrameQueue::new(),
            next_frame: None,
            skipped_frames: 0,
            handler: PlaybackStateHandler::Stopped,
            clock: PlaybackClock::new(),
            time_source: Box::new(SystemClock),
            decode_task: ScheduledTask::new("decode"),
            present_task: ScheduledTask::new("present"),
            last_presented: None,
            draining: false,
            end_of_stream: false,
            at_stream_start: true,
            settings: PlaybackSettings::default(),
            events: Box::new(events),
        }
    }

    /// Replaces the scheduling parameters.
    #[must_use]
    pub fn with_settings(mut self, settings: PlaybackSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the wall-clock source. Intended for hosts with their own
    /// notion of time and for tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.time_source = Box::new(clock);
        self
    }

    // =========================================================================
    // Control surface
    // =========================================================================

    /// Starts or resumes playback.
    ///
    /// From `Stopped` playback restarts at the beginning of the stream.
    /// With nothing decoded yet the manager reports `Buffering` until the
    /// frame queue fills.
    /// During a seek, playback resumes once the seek lands.
    pub fn resume(&mut self) {
        match self.handler.transition(Request::Play) {
            Transition::Ignore => {}
            Transition::Enter(next) => self.enter(next),
            Transition::Rewind => self.rewind_and_play(),
            Transition::SeekIntentChanged => debug!("playback resumes after seek"),
        }
    }

    /// Pauses playback. During a seek, the seek lands paused.
    pub fn pause(&mut self) {
        match self.handler.transition(Request::Pause) {
            Transition::Ignore | Transition::Rewind => {}
            Transition::Enter(next) => self.enter(next),
            Transition::SeekIntentChanged => debug!("playback pauses after seek"),
        }
    }

    /// Seeks back to the first frame and plays.
    pub fn restart(&mut self) {
        self.seek(Duration::ZERO, SeekMode::Accurate);
        if matches!(self.handler, PlaybackStateHandler::Seeking(_)) {
            self.resume();
        }
    }

    /// Seeks with the configured default mode.
    pub fn seek_default(&mut self, timestamp: Duration) {
        self.seek(timestamp, self.settings.default_seek_mode);
    }

    /// Stops playback and discards everything decoded so far.
    pub fn stop(&mut self) {
        if let Transition::Enter(next) = self.handler.transition(Request::Stop) {
            self.discard_buffered();
            self.enter(next);
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.handler.is_playing()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.handler.state()
    }

    /// Returns the media time being played. During a seek this is the seek
    /// target.
    #[must_use]
    pub fn current_playback_time(&self) -> Duration {
        match &self.handler {
            PlaybackStateHandler::Seeking(seek) => seek.target(),
            _ => self.clock.position(self.time_source.now()),
        }
    }

    /// Returns the duration of the selected track.
    ///
    /// # Errors
    ///
    /// Returns the demuxer's error if the duration cannot be determined.
    pub fn duration(&mut self) -> Result<Duration, DemuxerError> {
        self.demuxer.track_duration(self.track)
    }

    /// Number of frames dropped because they were late.
    #[must_use]
    pub fn skipped_frame_count(&self) -> u64 {
        self.skipped_frames
    }

    #[must_use]
    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Returns the earliest instant at which a task wants to run.
    ///
    /// `None` means nothing is scheduled until the next control call.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.present_task.deadline(), self.decode_task.deadline()) {
            (Some(present), Some(decode)) => Some(present.min(decode)),
            (present, decode) => present.or(decode),
        }
    }

    /// Runs every task whose deadline has passed, presentation first.
    ///
    /// Each task fires at most once per call.
    pub fn run_due_tasks(&mut self) {
        let now = self.time_source.now();
        if self.present_task.is_due(now) {
            self.present_tick();
        }
        if self.decode_task.is_due(now) {
            self.decode_tick();
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Installs `next` and runs its entry actions.
    ///
    /// Playing with nothing decoded yet starts out Buffering.
    fn enter(&mut self, next: PlaybackStateHandler) {
        let next = if next == PlaybackStateHandler::Playing && self.nothing_to_present() {
            PlaybackStateHandler::Buffering
        } else {
            next
        };
        let now = self.time_source.now();
        let previous = self.handler.state();
        self.handler = next;

        match self.handler.state() {
            PlaybackState::Stopped | PlaybackState::Paused => {
                self.clock.pause(now);
                self.decode_task.disarm();
                self.present_task.disarm();
            }
            PlaybackState::Playing => {
                self.clock.resume(now);
                self.present_task.arm_at(now);
                if self.end_of_stream {
                    self.decode_task.disarm();
                } else {
                    self.decode_task.arm_at(now);
                }
            }
            PlaybackState::Buffering => {
                self.clock.pause(now);
                self.present_task.disarm();
                if self.end_of_stream {
                    self.decode_task.disarm();
                } else {
                    self.decode_task.arm_at(now);
                }
            }
            PlaybackState::Seeking => {
                self.clock.pause(now);
                self.present_task.disarm();
                self.decode_task.arm_at(now);
            }
        }

        let state = self.handler.state();
        if state != previous {
            debug!(from = %previous, to = %state, "playback state changed");
            self.events.dispatch(PlaybackEvent::StateChanged(state));
        }
    }

    /// Returns to the first sample of the stream and starts playing.
    fn rewind_and_play(&mut self) {
        if !self.at_stream_start {
            if let Err(error) =
                self.demuxer
                    .seek_to_most_recent_keyframe(self.track, Duration::ZERO, None)
            {
                self.fail(error.into());
                return;
            }
            self.discard_buffered();
            self.decoder.reset();
            self.draining = false;
            self.end_of_stream = false;
            self.last_presented = None;
            self.clock.set_position(Duration::ZERO, self.time_source.now());
            self.at_stream_start = true;
            debug!("rewound to start of stream");
        }
        self.enter(PlaybackStateHandler::Playing);
    }

    fn nothing_to_present(&self) -> bool {
        self.frame_queue.is_empty() && self.next_frame.is_none() && !self.end_of_stream
    }

    /// Drops the queue and the pending frame.
    fn discard_buffered(&mut self) {
        self.frame_queue.clear();
        self.next_frame = None;
    }

    /// Stops playback on an unrecoverable error and reports it.
    fn fail(&mut self, fatal: FatalPlaybackError) {
        error!(error = %fatal, state = self.handler.name(), "fatal playback error");
        self.discard_buffered();
        self.enter(PlaybackStateHandler::Stopped);
        self.events.dispatch(PlaybackEvent::FatalError(fatal));
    }

    fn dispatch_decoder_error(&mut self, error: DecoderError) {
        debug!(%error, "decoder error");
        self.events.dispatch(PlaybackEvent::DecoderError(error));
    }
}

impl Drop for PlaybackManager {
    fn drop(&mut self) {
        self.decode_task.disarm();
        self.present_task.disarm();
        self.discard_buffered();
        trace!(state = self.handler.name(), "playback manager released");
    }
}
