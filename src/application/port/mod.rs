// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the playback core remains
//! independent of concrete demuxers and codecs.
//!
//! # Available Ports
//!
//! - [`clock`]: Monotonic wall-clock time
//! - [`demuxer`]: Encoded sample source with keyframe seeking
//! - [`video`]: Video decoding
//!
//! # Design Notes
//!
//! - All traits use domain types only (no `FFmpeg` types)
//! - Traits are `Send` so a manager can move to its event-loop thread
//! - Methods return `Result` with domain error types
//! - No `async fn`; the core never waits, it reschedules

pub mod clock;
pub mod demuxer;
pub mod video;

// Re-export main types for convenience
pub use clock::{Clock, SystemClock};
pub use demuxer::Demuxer;
pub use video::VideoDecoder;
