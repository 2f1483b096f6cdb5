// SPDX-License-Identifier: MPL-2.0
//! Video playback engine.
//!
//! This module schedules decoding and presentation of a single video track
//! on the host's event loop: a bounded frame queue between two re-armable
//! tasks, a five-state playback state machine, and seek resolution.

pub mod driver;
pub mod events;
pub mod frame_queue;
mod manager;
pub mod state;
pub mod sync;
pub mod timer;

pub use driver::{drive, PlaybackCommand, PlaybackHandle};
pub use events::{ChannelSink, PlaybackEvent, PlaybackEventSink};
pub use frame_queue::{FrameQueue, FrameQueueItem, FRAME_BUFFER_COUNT};
pub use manager::{PlaybackManager, PlaybackSettings};
pub use state::{PlaybackStateHandler, SeekState};
pub use sync::PlaybackClock;
pub use timer::ScheduledTask;
