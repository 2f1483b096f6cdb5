// SPDX-License-Identifier: MPL-2.0
//! Domain error types.
//!
//! These errors describe failures of the external collaborators (demuxer,
//! decoder) and the unrecoverable conditions of the playback core. They carry
//! plain messages so they can be cloned into host events.

mod playback;

pub use playback::{DecoderError, DemuxerError, FatalPlaybackError};
