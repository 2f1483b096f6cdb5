// SPDX-License-Identifier: MPL-2.0
//! Media-time clock for frame presentation.
//!
//! Playback time is derived from wall-clock time: an anchor pairs a media
//! timestamp with the instant it was reached, and the current position is
//! the anchor plus the wall time elapsed since. Pausing folds the elapsed
//! time into the anchor so the position freezes.
//!
//! The clock never reads the time itself; every call takes `now` from the
//! manager's [`Clock`](crate::application::port::Clock).

use std::time::{Duration, Instant};

/// Wall-clock anchored playback position.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    /// Media time at the anchor.
    anchor_media: Duration,
    /// Wall time at the anchor. `None` while paused.
    anchor_wall: Option<Instant>,
}

impl PlaybackClock {
    /// Creates a paused clock at media time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts advancing from the current position. No-op if running.
    pub fn resume(&mut self, now: Instant) {
        if self.anchor_wall.is_none() {
            self.anchor_wall = Some(now);
        }
    }

    /// Freezes the position. No-op if already paused.
    pub fn pause(&mut self, now: Instant) {
        if self.anchor_wall.is_some() {
            self.anchor_media = self.position(now);
            self.anchor_wall = None;
        }
    }

    /// Jumps to `position`, keeping the running/paused status.
    pub fn set_position(&mut self, position: Duration, now: Instant) {
        self.anchor_media = position;
        if self.anchor_wall.is_some() {
            self.anchor_wall = Some(now);
        }
    }

    /// Returns the media time at `now`.
    #[must_use]
    pub fn position(&self, now: Instant) -> Duration {
        match self.anchor_wall {
            Some(wall) => self.anchor_media + now.saturating_duration_since(wall),
            None => self.anchor_media,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.anchor_wall.is_some()
    }

    /// Returns the wall instant at which media time reaches `timestamp`.
    ///
    /// `None` while paused. Timestamps behind the anchor map to the anchor
    /// instant, which is already in the past.
    #[must_use]
    pub fn instant_of(&self, timestamp: Duration) -> Option<Instant> {
        self.anchor_wall
            .map(|wall| wall + timestamp.saturating_sub(self.anchor_media))
    }
}
