// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with no infrastructure dependencies.
//!
//! This module contains pure domain types, value objects, and error
//! definitions. Apart from `thiserror` for error derivation it depends only
//! on `std`, which keeps it testable in isolation.
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy ([`DecoderError`](error::DecoderError),
//!   [`DemuxerError`](error::DemuxerError), [`FatalPlaybackError`](error::FatalPlaybackError))
//! - [`media`]: Media types ([`RawImage`](media::RawImage), [`Sample`](media::Sample),
//!   [`DecodedFrame`](media::DecodedFrame), [`Track`](media::Track))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`SeekMode`](video::SeekMode), [`DecodeInterval`](video::DecodeInterval),
//!   [`SampleBudget`](video::SampleBudget))

pub mod error;
pub mod media;
pub mod video;
