// SPDX-License-Identifier: MPL-2.0
//! Seek resolution.
//!
//! A seek repositions the demuxer at the closest keyframe, then lets the
//! decode task catch up while the active [`SeekState`] filters its output.
//! The first accepted frame is shown immediately and the clock is anchored on
//! it before playback resumes or stays paused.

use super::PlaybackManager;
use crate::domain::error::DemuxerError;
use crate::domain::media::DecodedFrame;
use crate::domain::video::SeekMode;
use crate::video_player::frame_queue::FrameQueueItem;
use crate::video_player::state::{PlaybackStateHandler, SeekState};
use std::time::Duration;
use tracing::{debug, trace, warn};

impl PlaybackManager {
    /// Moves playback to `target`.
    ///
    /// A seek issued while seeking restarts with the new target and keeps the
    /// previous resume intent.
    pub fn seek(&mut self, target: Duration, mode: SeekMode) {
        let resume_playing = self.handler.is_playing();
        let hint = self.earliest_available_sample();
        debug!(
            target_ms = target.as_millis(),
            ?mode,
            resume_playing,
            "seeking"
        );

        let repositioned = match self
            .demuxer
            .seek_to_most_recent_keyframe(self.track, target, hint)
        {
            Ok(position) => position,
            Err(DemuxerError::CannotSeekBackward) => {
                warn!("stream cannot seek backward, seeking from start");
                match self
                    .demuxer
                    .seek_to_most_recent_keyframe(self.track, Duration::ZERO, None)
                {
                    Ok(position) => Some(position.unwrap_or(Duration::ZERO)),
                    Err(error) => {
                        self.fail(error.into());
                        return;
                    }
                }
            }
            Err(error) => {
                self.fail(error.into());
                return;
            }
        };
        self.at_stream_start = false;

        let buffered: Vec<FrameQueueItem> = if let Some(keyframe) = repositioned {
            trace!(keyframe_ms = keyframe.as_millis(), "demuxer repositioned");
            self.discard_buffered();
            self.decoder.reset();
            self.draining = false;
            self.end_of_stream = false;
            // Nothing before the keyframe is decoded any more
            self.last_presented = Some(keyframe);
            Vec::new()
        } else {
            self.next_frame
                .take()
                .into_iter()
                .chain(self.frame_queue.drain())
                .collect()
        };

        self.enter(PlaybackStateHandler::Seeking(SeekState::new(
            target,
            mode,
            resume_playing,
        )));

        // Without a reposition, what is already decoded may satisfy the seek.
        for item in buffered {
            if matches!(self.handler, PlaybackStateHandler::Seeking(_)) {
                self.offer_to_seek(item);
            } else if !self.frame_queue.push(item) {
                warn!("frame queue full, dropping decoded item");
            }
        }
    }

    /// Filters a decode result through the active seek.
    pub(super) fn offer_to_seek(&mut self, item: FrameQueueItem) {
        let accepted = match item {
            FrameQueueItem::Error(error) => {
                self.dispatch_decoder_error(error);
                return;
            }
            FrameQueueItem::Frame { image, timestamp } => {
                let PlaybackStateHandler::Seeking(seek) = &mut self.handler else {
                    return;
                };
                seek.offer(DecodedFrame { image, timestamp })
            }
        };

        if let Some(frame) = accepted {
            self.complete_seek(Some(frame));
        }
    }

    /// Lands the seek on the last frame decoded before its target.
    pub(super) fn finish_seek_with_fallback(&mut self) {
        let fallback = match &mut self.handler {
            PlaybackStateHandler::Seeking(seek) => seek.take_fallback(),
            _ => return,
        };
        self.complete_seek(fallback);
    }

    fn complete_seek(&mut self, frame: Option<DecodedFrame>) {
        let PlaybackStateHandler::Seeking(seek) = &self.handler else {
            return;
        };
        let resume_playing = seek.resume_playing();
        let position = frame.as_ref().map_or(seek.target(), |frame| frame.timestamp);
        debug!(
            position_ms = position.as_millis(),
            resume_playing, "seek complete"
        );

        self.clock.set_position(position, self.time_source.now());
        if let Some(frame) = frame {
            self.present(frame.image, frame.timestamp);
        }

        let next = if resume_playing {
            PlaybackStateHandler::Playing
        } else {
            PlaybackStateHandler::Paused
        };
        self.enter(next);
    }

    /// Earliest media time still decoded: the last presented frame or the
    /// pending one.
    fn earliest_available_sample(&self) -> Option<Duration> {
        let pending = self.next_frame.as_ref().and_then(FrameQueueItem::timestamp);
        match (self.last_presented, pending) {
            (Some(presented), Some(pending)) => Some(presented.min(pending)),
            (presented, pending) => presented.or(pending),
        }
    }
}
