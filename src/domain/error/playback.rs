// SPDX-License-Identifier: MPL-2.0
//! Error taxonomy of the playback pipeline.
//!
//! - [`DecoderError`]: recoverable, surfaced in presentation order
//! - [`DemuxerError`]: read or seek failure of the container layer
//! - [`FatalPlaybackError`]: stops playback immediately

use thiserror::Error;

/// A recoverable failure while turning one encoded sample into an image.
///
/// Playback continues after a decoder error; the failing sample is simply
/// skipped at presentation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    /// The sample data is damaged.
    #[error("corrupted sample: {0}")]
    Corrupted(String),

    /// The sample is well-formed but violates the codec's constraints.
    #[error("invalid sample: {0}")]
    Invalid(String),

    /// The sample uses a codec feature the decoder does not support.
    #[error("unsupported codec feature: {0}")]
    NotImplemented(String),

    /// The decoder could not allocate a picture buffer.
    #[error("decoder out of memory: {0}")]
    Memory(String),

    /// Reading the next sample failed while catching up after a seek.
    #[error("sample read failed: {0}")]
    SampleRead(#[from] DemuxerError),
}

/// A failure of the demuxer while reading or repositioning a track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemuxerError {
    /// The underlying byte source failed.
    #[error("demuxer I/O error: {0}")]
    Io(String),

    /// The container structure is damaged.
    #[error("corrupted container: {0}")]
    Corrupted(String),

    /// The requested track does not exist in the container.
    #[error("unknown track {0}")]
    UnknownTrack(u64),

    /// The stream cannot seek backward past its current read position.
    ///
    /// The playback manager recovers from this by repositioning at the
    /// start of the stream.
    #[error("stream cannot seek backward past its current position")]
    CannotSeekBackward,
}

/// An unrecoverable condition that forces playback into the stopped state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalPlaybackError {
    /// The demuxer failed outside of seek recovery.
    #[error("demuxer failure: {0}")]
    Demuxer(#[from] DemuxerError),

    /// A system resource (memory, handles) ran out.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other condition the host cannot recover from.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demuxer_error_converts_into_fatal_error() {
        let fatal: FatalPlaybackError = DemuxerError::Io("unexpected eof".into()).into();
        assert_eq!(
            fatal,
            FatalPlaybackError::Demuxer(DemuxerError::Io("unexpected eof".into()))
        );
    }

    #[test]
    fn demuxer_error_converts_into_decoder_error() {
        let error: DecoderError = DemuxerError::Corrupted("bad cluster".into()).into();
        assert!(matches!(error, DecoderError::SampleRead(_)));
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            DecoderError::Corrupted("truncated slice".into()).to_string(),
            "corrupted sample: truncated slice"
        );
        assert_eq!(
            DemuxerError::CannotSeekBackward.to_string(),
            "stream cannot seek backward past its current position"
        );
        assert_eq!(
            FatalPlaybackError::Demuxer(DemuxerError::UnknownTrack(3)).to_string(),
            "demuxer failure: unknown track 3"
        );
    }
}
