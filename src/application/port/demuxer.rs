// SPDX-License-Identifier: MPL-2.0
//! Demuxer port definition.
//!
//! This module defines the [`Demuxer`] trait, the source of encoded samples
//! for the playback manager. Container parsing itself lives in
//! infrastructure adapters.

use crate::domain::error::DemuxerError;
use crate::domain::media::{Sample, Track};
use std::time::Duration;

/// Port for reading encoded samples from an opened container.
///
/// # Thread Safety
///
/// Implementations must be `Send`. They are only ever called from the
/// manager's single scheduling thread.
pub trait Demuxer: Send {
    /// Reads the next sample of `track` in decode order.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns a [`DemuxerError`] if the container cannot be read.
    fn next_sample(&mut self, track: Track) -> Result<Option<Sample>, DemuxerError>;

    /// Repositions `track` at the most recent keyframe at or before
    /// `timestamp`.
    ///
    /// `earliest_available_sample` is the earliest timestamp the caller still
    /// has decoded. When the current read position already satisfies the
    /// request (the keyframe lies between that hint and the read position),
    /// the implementation may skip the reposition and return `Ok(None)`.
    /// Otherwise it returns the timestamp of the keyframe reached.
    ///
    /// # Errors
    ///
    /// Returns [`DemuxerError::CannotSeekBackward`] when the stream cannot go
    /// back past its current position, or any other [`DemuxerError`] when the
    /// reposition fails.
    fn seek_to_most_recent_keyframe(
        &mut self,
        track: Track,
        timestamp: Duration,
        earliest_available_sample: Option<Duration>,
    ) -> Result<Option<Duration>, DemuxerError>;

    /// Returns the total duration of `track`.
    ///
    /// # Errors
    ///
    /// Returns a [`DemuxerError`] if the duration cannot be determined.
    fn track_duration(&mut self, track: Track) -> Result<Duration, DemuxerError>;
}
