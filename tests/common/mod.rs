// SPDX-License-Identifier: MPL-2.0
//! Scripted collaborators shared by the integration tests.
//!
//! The demuxer and decoder replay a fixed stream description, the clock only
//! moves when a test (or the decoder, to simulate slow decoding) moves it,
//! and every dispatched event is recorded with the instant it happened.

#![allow(dead_code)]

use lens_playback::application::port::{Clock, Demuxer, VideoDecoder};
use lens_playback::domain::error::{DecoderError, DemuxerError};
use lens_playback::domain::media::{DecodedFrame, RawImage, Sample, Track};
use lens_playback::domain::video::PlaybackState;
use lens_playback::video_player::{PlaybackEvent, PlaybackManager, PlaybackSettings};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const TRACK: Track = Track(0);

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// =============================================================================
// Clock
// =============================================================================

/// Clock that only advances on request. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<Mutex<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    /// Moves the clock forward to `instant`. Never moves it back.
    pub fn advance_to(&self, instant: Instant) {
        let mut now = self.0.lock().unwrap();
        if instant > *now {
            *now = instant;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().unwrap()
    }
}

// =============================================================================
// Stream script
// =============================================================================

/// What the decoder does with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Frame,
    DecodeError,
    NeedMoreInput,
}

impl Outcome {
    fn tag(self) -> u8 {
        match self {
            Self::Frame => b'F',
            Self::DecodeError => b'E',
            Self::NeedMoreInput => b'H',
        }
    }
}

#[derive(Debug, Clone)]
pub enum Entry {
    Sample {
        timestamp: Duration,
        keyframe: bool,
        outcome: Outcome,
    },
    ReadError,
}

impl Entry {
    fn timestamp(&self) -> Option<Duration> {
        match self {
            Self::Sample { timestamp, .. } => Some(*timestamp),
            Self::ReadError => None,
        }
    }
}

/// Frames every `step_ms` from zero below `end_ms`, a keyframe every
/// `gop` frames.
pub fn frames(step_ms: u64, end_ms: u64, gop: usize) -> Vec<Entry> {
    (0..end_ms)
        .step_by(step_ms as usize)
        .enumerate()
        .map(|(index, at)| Entry::Sample {
            timestamp: ms(at),
            keyframe: index % gop == 0,
            outcome: Outcome::Frame,
        })
        .collect()
}

/// Frames at the given timestamps, all keyframes.
pub fn frames_at(timestamps_ms: &[u64]) -> Vec<Entry> {
    timestamps_ms
        .iter()
        .map(|&at| Entry::Sample {
            timestamp: ms(at),
            keyframe: true,
            outcome: Outcome::Frame,
        })
        .collect()
}

// =============================================================================
// Demuxer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekBehavior {
    /// Jump to the last keyframe at or before the target.
    Reposition,
    /// Refuse to go back past the read position, except to the start.
    ForwardOnly,
    /// Report that the read position already satisfies the request.
    KeepPosition,
    /// Skip the reposition only when the keyframe lies between the hint and
    /// the read position.
    HonorHint,
    /// Every seek fails.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekCall {
    pub target: Duration,
    pub earliest_available_sample: Option<Duration>,
}

pub struct ScriptedDemuxer {
    entries: Vec<Entry>,
    cursor: usize,
    behavior: SeekBehavior,
    seeks: Arc<Mutex<Vec<SeekCall>>>,
}

impl ScriptedDemuxer {
    fn last_read(&self) -> Option<Duration> {
        self.entries[..self.cursor]
            .iter()
            .rev()
            .find_map(Entry::timestamp)
    }

    /// Timestamp of the next sample to read.
    fn read_position(&self) -> Option<Duration> {
        self.entries[self.cursor..]
            .iter()
            .find_map(Entry::timestamp)
            .or_else(|| self.last_read())
    }

    fn keyframe_index(&self, target: Duration) -> usize {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Sample {
                    timestamp,
                    keyframe: true,
                    ..
                } if *timestamp <= target => Some(index),
                _ => None,
            })
            .last()
            .unwrap_or(0)
    }

    fn reposition(&mut self, target: Duration) -> Option<Duration> {
        let index = self.keyframe_index(target);
        self.cursor = index;
        self.entries[index].timestamp()
    }
}

impl Demuxer for ScriptedDemuxer {
    fn next_sample(&mut self, _track: Track) -> Result<Option<Sample>, DemuxerError> {
        let Some(entry) = self.entries.get(self.cursor).cloned() else {
            return Ok(None);
        };
        self.cursor += 1;
        match entry {
            Entry::Sample {
                timestamp,
                keyframe,
                outcome,
            } => Ok(Some(Sample::new(vec![outcome.tag()], timestamp, keyframe))),
            Entry::ReadError => Err(DemuxerError::Io("read failed".to_string())),
        }
    }

    fn seek_to_most_recent_keyframe(
        &mut self,
        _track: Track,
        timestamp: Duration,
        earliest_available_sample: Option<Duration>,
    ) -> Result<Option<Duration>, DemuxerError> {
        self.seeks.lock().unwrap().push(SeekCall {
            target: timestamp,
            earliest_available_sample,
        });

        match self.behavior {
            SeekBehavior::Reposition => Ok(Some(self.reposition(timestamp).unwrap_or_default())),
            SeekBehavior::ForwardOnly => {
                let behind = self.last_read().is_some_and(|read| timestamp < read);
                if behind && !timestamp.is_zero() {
                    Err(DemuxerError::CannotSeekBackward)
                } else {
                    Ok(Some(self.reposition(timestamp).unwrap_or_default()))
                }
            }
            SeekBehavior::KeepPosition => Ok(None),
            SeekBehavior::HonorHint => {
                let keyframe = self.entries[self.keyframe_index(timestamp)].timestamp();
                let covered = match (earliest_available_sample, keyframe, self.read_position()) {
                    (Some(hint), Some(keyframe), Some(position)) => {
                        hint <= keyframe && keyframe <= position
                    }
                    _ => false,
                };
                if covered {
                    Ok(None)
                } else {
                    Ok(Some(self.reposition(timestamp).unwrap_or_default()))
                }
            }
            SeekBehavior::Fail => Err(DemuxerError::Io("seek failed".to_string())),
        }
    }

    fn track_duration(&mut self, _track: Track) -> Result<Duration, DemuxerError> {
        Ok(self
            .entries
            .iter()
            .rev()
            .find_map(Entry::timestamp)
            .unwrap_or_default())
    }
}

// =============================================================================
// Decoder
// =============================================================================

pub struct ScriptedDecoder {
    /// Wall time a sample that yields no picture takes to decode.
    stall: Option<(ManualClock, Duration)>,
    /// Pictures held back before output starts, like B-frame reordering.
    delay: usize,
    held: VecDeque<Duration>,
    resets: Arc<AtomicUsize>,
}

fn picture(timestamp: Duration) -> DecodedFrame {
    DecodedFrame::new(RawImage::from_rgba(1, 1, vec![0, 0, 0, 255]), timestamp)
}

impl VideoDecoder for ScriptedDecoder {
    fn submit(&mut self, sample: Sample) -> Result<Option<DecodedFrame>, DecoderError> {
        match sample.data.first() {
            Some(b'F') => {
                self.held.push_back(sample.timestamp);
                if self.held.len() > self.delay {
                    Ok(self.held.pop_front().map(picture))
                } else {
                    Ok(None)
                }
            }
            Some(b'E') => Err(DecoderError::Corrupted(format!(
                "sample at {}ms",
                sample.timestamp.as_millis()
            ))),
            _ => {
                if let Some((clock, stall)) = &self.stall {
                    clock.advance(*stall);
                }
                Ok(None)
            }
        }
    }

    fn drain(&mut self) -> Result<Option<DecodedFrame>, DecoderError> {
        Ok(self.held.pop_front().map(picture))
    }

    fn reset(&mut self) {
        self.held.clear();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Demuxer and decoder over `entries` without any clock coupling.
pub fn scripted_pair(entries: Vec<Entry>) -> (ScriptedDemuxer, ScriptedDecoder) {
    let demuxer = ScriptedDemuxer {
        entries,
        cursor: 0,
        behavior: SeekBehavior::Reposition,
        seeks: Arc::default(),
    };
    let decoder = ScriptedDecoder {
        stall: None,
        delay: 0,
        held: VecDeque::new(),
        resets: Arc::default(),
    };
    (demuxer, decoder)
}

// =============================================================================
// Harness
// =============================================================================

pub type EventLog = Arc<Mutex<Vec<(Instant, PlaybackEvent)>>>;

pub struct Harness {
    pub manager: PlaybackManager,
    pub clock: ManualClock,
    pub start: Instant,
    events: EventLog,
    resets: Arc<AtomicUsize>,
    seeks: Arc<Mutex<Vec<SeekCall>>>,
}

pub struct HarnessBuilder {
    entries: Vec<Entry>,
    behavior: SeekBehavior,
    stall: Option<Duration>,
    delay: usize,
    settings: PlaybackSettings,
}

impl HarnessBuilder {
    pub fn seek_behavior(mut self, behavior: SeekBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Makes every sample that yields no picture take `stall` of wall time.
    pub fn stall(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }

    /// Makes the decoder hold back `delay` pictures until it is drained.
    pub fn reorder_delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }

    pub fn settings(mut self, settings: PlaybackSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Harness {
        let clock = ManualClock::new();
        let events: EventLog = Arc::default();
        let resets = Arc::new(AtomicUsize::new(0));
        let seeks = Arc::default();

        let demuxer = ScriptedDemuxer {
            entries: self.entries,
            cursor: 0,
            behavior: self.behavior,
            seeks: Arc::clone(&seeks),
        };
        let decoder = ScriptedDecoder {
            stall: self.stall.map(|stall| (clock.clone(), stall)),
            delay: self.delay,
            held: VecDeque::new(),
            resets: Arc::clone(&resets),
        };
        let sink = {
            let events = Arc::clone(&events);
            let clock = clock.clone();
            move |event: PlaybackEvent| events.lock().unwrap().push((clock.now(), event))
        };

        let manager = PlaybackManager::new(demuxer, TRACK, decoder, sink)
            .with_settings(self.settings)
            .with_clock(clock.clone());

        Harness {
            manager,
            start: clock.now(),
            clock,
            events,
            resets,
            seeks,
        }
    }
}

impl Harness {
    pub fn builder(entries: Vec<Entry>) -> HarnessBuilder {
        HarnessBuilder {
            entries,
            behavior: SeekBehavior::Reposition,
            stall: None,
            delay: 0,
            settings: PlaybackSettings::default(),
        }
    }

    pub fn new(entries: Vec<Entry>) -> Self {
        Self::builder(entries).build()
    }

    /// Jumps to the next deadline and runs what is due.
    ///
    /// Returns false when nothing is scheduled.
    pub fn step(&mut self) -> bool {
        let Some(deadline) = self.manager.next_deadline() else {
            return false;
        };
        self.clock.advance_to(deadline);
        self.manager.run_due_tasks();
        true
    }

    /// Steps until nothing is scheduled.
    pub fn run_until_idle(&mut self) {
        for _ in 0..100_000 {
            if !self.step() {
                return;
            }
        }
        panic!("playback never went idle");
    }

    /// Steps until `count` frames have been presented in total.
    pub fn run_until_frames(&mut self, count: usize) {
        for _ in 0..100_000 {
            if self.presented().len() >= count || !self.step() {
                return;
            }
        }
        panic!("frame count never reached");
    }

    /// Steps through every deadline up to `instant`, then sets the clock to it.
    pub fn run_until(&mut self, instant: Instant) {
        for _ in 0..100_000 {
            match self.manager.next_deadline() {
                Some(deadline) if deadline <= instant => {
                    self.step();
                }
                _ => {
                    self.clock.advance_to(instant);
                    return;
                }
            }
        }
        panic!("deadline never passed");
    }

    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Events dispatched after the first `skip`.
    pub fn events_since(&self, skip: usize) -> Vec<PlaybackEvent> {
        self.events().into_iter().skip(skip).collect()
    }

    /// Timestamps of presented frames.
    pub fn presented(&self) -> Vec<Duration> {
        presented_in(&self.events())
    }

    /// Presented frames with the wall time elapsed since the harness started.
    pub fn presented_at(&self) -> Vec<(Duration, Duration)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(at, event)| match event {
                PlaybackEvent::FramePresented { timestamp, .. } => {
                    Some((at.duration_since(self.start), *timestamp))
                }
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<PlaybackState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::StateChanged(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn seeks(&self) -> Vec<SeekCall> {
        self.seeks.lock().unwrap().clone()
    }

    /// Drops the manager and reports what it still holds on to.
    pub fn release(self) -> Released {
        let Harness {
            manager,
            events,
            resets,
            seeks,
            ..
        } = self;
        drop(manager);

        let logged = events.lock().unwrap().len();
        Released {
            logged,
            sink_alive: Arc::strong_count(&events) > 1,
            demuxer_alive: Arc::strong_count(&seeks) > 1,
            decoder_alive: Arc::strong_count(&resets) > 1,
        }
    }
}

/// State of the collaborators after the manager was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Released {
    /// Events recorded in total, including any dispatched while dropping.
    pub logged: usize,
    pub sink_alive: bool,
    pub demuxer_alive: bool,
    pub decoder_alive: bool,
}

pub fn presented_in(events: &[PlaybackEvent]) -> Vec<Duration> {
    events
        .iter()
        .filter_map(|event| match event {
            PlaybackEvent::FramePresented { timestamp, .. } => Some(*timestamp),
            _ => None,
        })
        .collect()
}
