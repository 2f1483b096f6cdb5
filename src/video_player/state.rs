// SPDX-License-Identifier: MPL-2.0
//! Playback state machine.
//!
//! Manages the lifecycle of playback with clear state transitions:
//! - Stopped: Nothing scheduled, initial state
//! - Playing: Decoding and presenting frames on time
//! - Paused: Presentation frozen, pending frame kept
//! - Buffering: Presentation suspended while the queue refills
//! - Seeking: Decoding toward a new position
//!
//! Requests never mutate the active state into another variant in place.
//! [`PlaybackStateHandler::transition`] computes the next value and the
//! manager installs it, running the entry actions of the new state.

use crate::domain::media::DecodedFrame;
use crate::domain::video::{PlaybackState, SeekMode};
use std::time::Duration;

/// Bookkeeping of an in-flight seek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekState {
    target: Duration,
    mode: SeekMode,
    /// Whether playback continues once the seek lands.
    resume_playing: bool,
    /// Latest frame decoded before the target, shown if the stream ends
    /// before reaching it.
    fallback: Option<DecodedFrame>,
}

impl SeekState {
    #[must_use]
    pub fn new(target: Duration, mode: SeekMode, resume_playing: bool) -> Self {
        Self {
            target,
            mode,
            resume_playing,
            fallback: None,
        }
    }

    #[must_use]
    pub fn target(&self) -> Duration {
        self.target
    }

    #[must_use]
    pub fn mode(&self) -> SeekMode {
        self.mode
    }

    #[must_use]
    pub fn resume_playing(&self) -> bool {
        self.resume_playing
    }

    /// Offers a decoded frame to the seek.
    ///
    /// Returns the frame back if it resolves the seek. Otherwise the frame
    /// becomes the fallback and `None` is returned.
    pub fn offer(&mut self, frame: DecodedFrame) -> Option<DecodedFrame> {
        match self.mode {
            SeekMode::Fast => Some(frame),
            SeekMode::Accurate if frame.timestamp >= self.target => Some(frame),
            SeekMode::Accurate => {
                self.fallback = Some(frame);
                None
            }
        }
    }

    /// Takes the fallback frame, if any was decoded.
    pub fn take_fallback(&mut self) -> Option<DecodedFrame> {
        self.fallback.take()
    }
}

/// The active playback state and its per-state data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStateHandler {
    #[default]
    Stopped,
    Playing,
    Paused,
    Buffering,
    Seeking(SeekState),
}

/// Control requests resolved by the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Play,
    Pause,
    /// The presentation task found nothing to show.
    Buffer,
    /// The frame queue reached capacity.
    BufferFilled,
    Stop,
}

/// Outcome of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The request has no effect in this state.
    Ignore,
    /// Install this state.
    Enter(PlaybackStateHandler),
    /// Rewind to the start of the stream, then play.
    Rewind,
    /// The active seek changed whether it resumes playback.
    SeekIntentChanged,
}

impl PlaybackStateHandler {
    /// Returns the copyable tag of this state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        match self {
            Self::Stopped => PlaybackState::Stopped,
            Self::Playing => PlaybackState::Playing,
            Self::Paused => PlaybackState::Paused,
            Self::Buffering => PlaybackState::Buffering,
            Self::Seeking(_) => PlaybackState::Seeking,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.state().as_str()
    }

    /// Returns true if the host should consider playback running.
    ///
    /// Buffering and a seek that will resume count as playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        match self {
            Self::Playing | Self::Buffering => true,
            Self::Seeking(seek) => seek.resume_playing,
            Self::Stopped | Self::Paused => false,
        }
    }

    /// Whether the decode task may run in this state.
    #[must_use]
    pub fn runs_decode(&self) -> bool {
        matches!(self, Self::Playing | Self::Buffering | Self::Seeking(_))
    }

    /// Whether the presentation task may run in this state.
    #[must_use]
    pub fn runs_presentation(&self) -> bool {
        self.state().is_presenting()
    }

    /// Resolves `request` against this state.
    ///
    /// Only a seek's resume intent is updated in place; every other change
    /// is returned as a new state for the caller to install.
    pub fn transition(&mut self, request: Request) -> Transition {
        match (request, self) {
            (Request::Play, Self::Stopped) => Transition::Rewind,
            (Request::Play, Self::Paused) | (Request::BufferFilled, Self::Buffering) => {
                Transition::Enter(Self::Playing)
            }
            (Request::Pause, Self::Playing | Self::Buffering) => Transition::Enter(Self::Paused),
            (Request::Buffer, Self::Playing) => Transition::Enter(Self::Buffering),
            (Request::Play, Self::Seeking(seek)) if !seek.resume_playing => {
                seek.resume_playing = true;
                Transition::SeekIntentChanged
            }
            (Request::Pause, Self::Seeking(seek)) if seek.resume_playing => {
                seek.resume_playing = false;
                Transition::SeekIntentChanged
            }
            (Request::Stop, Self::Stopped) => Transition::Ignore,
            (Request::Stop, _) => Transition::Enter(Self::Stopped),
            _ => Transition::Ignore,
        }
    }
}
