// SPDX-License-Identifier: MPL-2.0
//! Events delivered to the host.
//!
//! The manager dispatches every event synchronously from the scheduling
//! thread, in the order things happen. Frame and decoder-error events share
//! one total order: the order the frame queue drains.

use crate::domain::error::{DecoderError, FatalPlaybackError};
use crate::domain::media::RawImage;
use crate::domain::video::PlaybackState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A frame reached its presentation time and should be displayed now.
    FramePresented {
        image: Arc<RawImage>,
        timestamp: Duration,
    },
    /// A sample failed to decode. Playback continues.
    DecoderError(DecoderError),
    /// The playback state changed.
    StateChanged(PlaybackState),
    /// Playback stopped on an unrecoverable error.
    FatalError(FatalPlaybackError),
}

/// Receiver of [`PlaybackEvent`]s.
///
/// Implemented for any `FnMut(PlaybackEvent) + Send` closure.
pub trait PlaybackEventSink: Send {
    fn dispatch(&mut self, event: PlaybackEvent);
}

impl<F> PlaybackEventSink for F
where
    F: FnMut(PlaybackEvent) + Send,
{
    fn dispatch(&mut self, event: PlaybackEvent) {
        self(event);
    }
}

/// Forwards events into an unbounded tokio channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink(mpsc::UnboundedSender<PlaybackEvent>);

impl ChannelSink {
    /// Creates a sink and the receiver the host reads events from.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self(sender), receiver)
    }
}

impl PlaybackEventSink for ChannelSink {
    fn dispatch(&mut self, event: PlaybackEvent) {
        if self.0.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut received = Vec::new();
        {
            let mut sink = |event: PlaybackEvent| received.push(event);
            sink.dispatch(PlaybackEvent::StateChanged(PlaybackState::Playing));
        }
        assert_eq!(
            received,
            vec![PlaybackEvent::StateChanged(PlaybackState::Playing)]
        );
    }

    #[test]
    fn channel_sink_forwards_events_in_order() {
        let (mut sink, mut receiver) = ChannelSink::channel();
        sink.dispatch(PlaybackEvent::StateChanged(PlaybackState::Buffering));
        sink.dispatch(PlaybackEvent::DecoderError(DecoderError::Invalid("x".into())));

        assert_eq!(
            receiver.try_recv().ok(),
            Some(PlaybackEvent::StateChanged(PlaybackState::Buffering))
        );
        assert!(matches!(
            receiver.try_recv(),
            Ok(PlaybackEvent::DecoderError(_))
        ));
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut sink, receiver) = ChannelSink::channel();
        drop(receiver);
        sink.dispatch(PlaybackEvent::StateChanged(PlaybackState::Stopped));
    }
}
