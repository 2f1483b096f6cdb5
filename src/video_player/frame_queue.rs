// SPDX-License-Identifier: MPL-2.0
//! Bounded frame queue between the decode and presentation tasks.
//!
//! The decode task is the only producer and the presentation task the only
//! consumer. Neither ever waits on the queue: a full queue makes the decode
//! task skip its turn, an empty one sends playback into buffering.

use crate::domain::error::DecoderError;
use crate::domain::media::{DecodedFrame, RawImage};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Number of items the frame queue holds.
pub const FRAME_BUFFER_COUNT: usize = 4;

/// A decode result in presentation order.
///
/// Decoder errors travel through the queue like frames so the host sees them
/// in the same order the samples were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameQueueItem {
    /// A decoded picture and its media timestamp.
    Frame {
        image: Arc<RawImage>,
        timestamp: Duration,
    },
    /// The sample at this position failed to decode.
    Error(DecoderError),
}

impl FrameQueueItem {
    /// Returns the media timestamp of a frame, `None` for errors.
    #[must_use]
    pub fn timestamp(&self) -> Option<Duration> {
        match self {
            Self::Frame { timestamp, .. } => Some(*timestamp),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<DecodedFrame> for FrameQueueItem {
    fn from(frame: DecodedFrame) -> Self {
        Self::Frame {
            image: frame.image,
            timestamp: frame.timestamp,
        }
    }
}

impl From<DecoderError> for FrameQueueItem {
    fn from(error: DecoderError) -> Self {
        Self::Error(error)
    }
}

impl fmt::Display for FrameQueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame { timestamp, .. } => write!(f, "frame at {}ms", timestamp.as_millis()),
            Self::Error(error) => write!(f, "{error}"),
        }
    }
}

/// Fixed-capacity FIFO of [`FrameQueueItem`]s.
#[derive(Debug)]
pub struct FrameQueue {
    items: VecDeque<FrameQueueItem>,
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(FRAME_BUFFER_COUNT),
        }
    }

    /// Appends `item` at the tail.
    ///
    /// Returns `false` and drops the item when the queue is full. Callers
    /// check [`is_full`](Self::is_full) before decoding, so a rejected push
    /// means a scheduling bug rather than back-pressure.
    pub fn push(&mut self, item: FrameQueueItem) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(item);
        true
    }

    /// Removes and returns the head of the queue.
    pub fn pop(&mut self) -> Option<FrameQueueItem> {
        self.items.pop_front()
    }

    /// Removes all items, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = FrameQueueItem> + '_ {
        self.items.drain(..)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= FRAME_BUFFER_COUNT
    }
}
