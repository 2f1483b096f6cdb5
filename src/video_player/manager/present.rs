// SPDX-License-Identifier: MPL-2.0
//! Presentation task: shows frames on time and drops the late ones.

use super::PlaybackManager;
use crate::domain::media::RawImage;
use crate::video_player::events::PlaybackEvent;
use crate::video_player::frame_queue::FrameQueueItem;
use crate::video_player::state::{PlaybackStateHandler, Request, Transition};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

impl PlaybackManager {
    pub(super) fn present_tick(&mut self) {
        self.present_task.disarm();
        if !self.handler.runs_presentation() {
            return;
        }

        loop {
            let Some(item) = self.next_frame.take().or_else(|| self.frame_queue.pop()) else {
                self.on_queue_starved();
                return;
            };

            match item {
                FrameQueueItem::Error(error) => self.dispatch_decoder_error(error),
                FrameQueueItem::Frame { image, timestamp } => {
                    let now = self.time_source.now();
                    if timestamp > self.clock.position(now) {
                        self.hold_until_due(FrameQueueItem::Frame { image, timestamp }, now);
                    } else {
                        self.present(image, timestamp);
                        self.skip_late_frames();
                    }
                    return;
                }
            }
        }
    }

    /// Hands a frame to the host and records its media time.
    pub(super) fn present(&mut self, image: Arc<RawImage>, timestamp: Duration) {
        trace!(timestamp_ms = timestamp.as_millis(), "presenting frame");
        self.last_presented = Some(timestamp);
        self.events
            .dispatch(PlaybackEvent::FramePresented { image, timestamp });
    }

    /// Keeps `item` pending and wakes up exactly when it is due.
    fn hold_until_due(&mut self, item: FrameQueueItem, now: Instant) {
        let due = item
            .timestamp()
            .and_then(|timestamp| self.clock.instant_of(timestamp))
            .unwrap_or(now);
        self.next_frame = Some(item);
        self.present_task.arm_at(due);
    }

    /// Drops queued frames whose time has already passed.
    ///
    /// Stops at the first frame that is not late, which becomes pending.
    fn skip_late_frames(&mut self) {
        let now = self.time_source.now();
        let playback_time = self.clock.position(now);

        while let Some(item) = self.frame_queue.pop() {
            match item {
                FrameQueueItem::Error(error) => self.dispatch_decoder_error(error),
                FrameQueueItem::Frame { timestamp, .. } if timestamp < playback_time => {
                    self.skipped_frames += 1;
                    debug!(
                        timestamp_ms = timestamp.as_millis(),
                        skipped = self.skipped_frames,
                        "skipping late frame"
                    );
                }
                frame @ FrameQueueItem::Frame { .. } => {
                    self.hold_until_due(frame, now);
                    return;
                }
            }
        }

        self.present_task
            .arm_after(now, self.settings.decode_interval.as_duration());
    }

    /// Nothing left to show: stop at end of stream, otherwise buffer.
    fn on_queue_starved(&mut self) {
        let request = if self.end_of_stream {
            Request::Stop
        } else {
            Request::Buffer
        };
        if let Transition::Enter(next) = self.handler.transition(request) {
            if next == PlaybackStateHandler::Stopped {
                debug!("playback finished");
            }
            self.enter(next);
        }
    }
}
