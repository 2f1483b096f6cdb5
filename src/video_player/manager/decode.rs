// SPDX-License-Identifier: MPL-2.0
//! Decode task: pulls samples, feeds the decoder, fills the frame queue.

use super::PlaybackManager;
use crate::domain::error::DecoderError;
use crate::video_player::frame_queue::{FrameQueueItem, FRAME_BUFFER_COUNT};
use crate::video_player::state::{PlaybackStateHandler, Request, Transition};
use tracing::{debug, trace, warn};

impl PlaybackManager {
    /// Produces at most one queue item.
    ///
    /// Submits samples until the decoder returns a picture or an error, the
    /// stream ends, or the sample budget runs out.
    pub(super) fn decode_tick(&mut self) {
        self.decode_task.disarm();
        if !self.handler.runs_decode() {
            return;
        }

        if self.frame_queue.is_full() {
            let now = self.time_source.now();
            self.decode_task
                .arm_after(now, self.settings.decode_interval.as_duration());
            return;
        }

        if self.draining {
            self.drain_decoder();
            return;
        }

        for _ in 0..self.settings.sample_budget.value() {
            let sample = match self.demuxer.next_sample(self.track) {
                Ok(Some(sample)) => sample,
                Ok(None) => {
                    self.at_stream_start = false;
                    self.draining = true;
                    debug!("demuxer exhausted, draining decoder");
                    self.drain_decoder();
                    return;
                }
                Err(error) => {
                    if matches!(self.handler, PlaybackStateHandler::Seeking(_)) {
                        self.dispatch_decoder_error(DecoderError::SampleRead(error));
                        self.finish_seek_with_fallback();
                    } else {
                        self.fail(error.into());
                    }
                    return;
                }
            };
            self.at_stream_start = false;

            let timestamp_ms = sample.timestamp.as_millis();
            match self.decoder.submit(sample) {
                Ok(None) => trace!(timestamp_ms, "decoder needs more input"),
                Ok(Some(frame)) => {
                    self.accept(frame.into());
                    break;
                }
                Err(error) => {
                    self.accept(FrameQueueItem::Error(error));
                    break;
                }
            }
        }

        self.rearm_decode();
    }

    /// Collects one picture the decoder held back. End of stream is
    /// reached once the decoder has nothing left.
    fn drain_decoder(&mut self) {
        match self.decoder.drain() {
            Ok(Some(frame)) => self.accept(frame.into()),
            Ok(None) => {
                self.on_end_of_stream();
                return;
            }
            Err(error) => self.accept(FrameQueueItem::Error(error)),
        }
        self.rearm_decode();
    }

    /// Routes a decode result to the active seek or to the queue.
    fn accept(&mut self, item: FrameQueueItem) {
        if matches!(self.handler, PlaybackStateHandler::Seeking(_)) {
            self.offer_to_seek(item);
            return;
        }

        if !self.frame_queue.push(item) {
            warn!("frame queue full, dropping decoded item");
            return;
        }

        if self.frame_queue.is_full() {
            if let Transition::Enter(next) = self.handler.transition(Request::BufferFilled) {
                debug!("frame queue filled");
                self.enter(next);
            }
        }
    }

    fn rearm_decode(&mut self) {
        if !self.handler.runs_decode() || self.end_of_stream {
            return;
        }

        let now = self.time_source.now();
        let refilling = matches!(
            self.handler,
            PlaybackStateHandler::Buffering | PlaybackStateHandler::Seeking(_)
        );
        if refilling || self.frame_queue.len() < FRAME_BUFFER_COUNT / 2 {
            self.decode_task.arm_at(now);
        } else {
            self.decode_task
                .arm_after(now, self.settings.decode_interval.as_duration());
        }
    }

    /// Records end of stream. Presentation drains what is queued, then stops.
    fn on_end_of_stream(&mut self) {
        self.end_of_stream = true;
        debug!(queued = self.frame_queue.len(), "end of stream");

        match self.handler {
            PlaybackStateHandler::Buffering => {
                let next = if self.frame_queue.is_empty() && self.next_frame.is_none() {
                    PlaybackStateHandler::Stopped
                } else {
                    PlaybackStateHandler::Playing
                };
                self.enter(next);
            }
            PlaybackStateHandler::Seeking(_) => self.finish_seek_with_fallback(),
            _ => {}
        }
    }
}
