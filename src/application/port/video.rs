// SPDX-License-Identifier: MPL-2.0
//! Video decoding port definition.
//!
//! This module defines the [`VideoDecoder`] trait. Infrastructure adapters
//! (like `FFmpeg`) implement it; the playback manager drives it one sample at
//! a time from its decode task.
//!
//! # Design Notes
//!
//! - The decoder is **stateful**: it may hold reference pictures and reorder
//!   output, so one submitted sample yields zero or one picture
//! - Methods are not `async`; a call must return without waiting on I/O
//! - Uses domain types only (`Sample`, `DecodedFrame`, `DecoderError`)

use crate::domain::error::DecoderError;
use crate::domain::media::{DecodedFrame, Sample};

// =============================================================================
// VideoDecoder Trait
// =============================================================================

/// Port for turning encoded samples into pictures.
///
/// # Thread Safety
///
/// Implementations must be `Send` so a manager can be moved onto the thread
/// that runs its event loop. The decoder is **not** required to be `Sync`.
///
/// # Lifecycle
///
/// 1. Create decoder instance for the selected track
/// 2. Call `submit()` with each sample, in demuxer order
/// 3. At end of stream, call `drain()` until it returns `Ok(None)`
/// 4. Call `reset()` after the demuxer is repositioned
///
/// # Example
///
/// ```ignore
/// use lens_playback::application::port::VideoDecoder;
///
/// fn decode_all(decoder: &mut impl VideoDecoder, samples: Vec<Sample>) -> usize {
///     samples
///         .into_iter()
///         .filter_map(|sample| decoder.submit(sample).ok().flatten())
///         .count()
/// }
/// ```
pub trait VideoDecoder: Send {
    /// Submits one encoded sample.
    ///
    /// Returns `Ok(Some(frame))` when the decoder produced a picture,
    /// `Ok(None)` when it needs more input before it can output one.
    ///
    /// # Errors
    ///
    /// Returns a [`DecoderError`] if the sample cannot be decoded. The error is
    /// recoverable: later samples may still decode.
    fn submit(&mut self, sample: Sample) -> Result<Option<DecodedFrame>, DecoderError>;

    /// Returns the next picture still held back once no sample is left to
    /// submit, or `Ok(None)` when the decoder is empty.
    ///
    /// Decoders that never hold pictures back can keep the default.
    ///
    /// # Errors
    ///
    /// Returns a [`DecoderError`] if flushing the decoder fails.
    fn drain(&mut self) -> Result<Option<DecodedFrame>, DecoderError> {
        Ok(None)
    }

    /// Drops all internal decoding state.
    ///
    /// Called after a seek so no reference picture from before the new
    /// position leaks into the output.
    fn reset(&mut self);
}
