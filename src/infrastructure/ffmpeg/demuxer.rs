// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` container reader implementing the [`Demuxer`] port.

use super::{init_ffmpeg, secs_to_ticks, ticks_to_secs, FfmpegVideoDecoder};
use crate::application::port::Demuxer;
use crate::domain::error::DemuxerError;
use crate::domain::media::{Sample, Track};
use crate::error::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// `FFmpeg`-based demuxer.
///
/// Samples of tracks other than the requested one are dropped while
/// reading; only one track is played at a time.
pub struct FfmpegDemuxer {
    state: InputState,
    /// Sample read while locating a keyframe, returned by the next read.
    peeked: Option<Sample>,
    /// Timestamp of the most recently returned sample.
    read_position: Duration,
}

/// Input context wrapper.
struct InputState {
    input: ffmpeg_next::format::context::Input,
}

// SAFETY: InputState contains an FFmpeg format context with internal raw
// pointers. It is safe to send between threads because:
// 1. The context is only accessed through `&mut self` (exclusive access)
// 2. No pointer into it is shared outside this struct
// 3. The demuxer is used from one thread at a time (move semantics)
unsafe impl Send for InputState {}

impl FfmpegDemuxer {
    /// Opens a container for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if `FFmpeg` cannot be initialized or the file cannot
    /// be opened.
    pub fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;

        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {}", path.display())));
        }

        let input = ffmpeg_next::format::input(path)
            .map_err(|e| Error::Media(format!("Failed to open video: {e}")))?;

        Ok(Self {
            state: InputState { input },
            peeked: None,
            read_position: Duration::ZERO,
        })
    }

    /// Returns the best video stream of the container.
    #[must_use]
    pub fn best_video_track(&self) -> Option<Track> {
        self.state
            .input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .map(|stream| Track(stream.index() as u64))
    }

    /// Creates a decoder for `track`.
    ///
    /// # Errors
    ///
    /// Returns an error if the track does not exist or its codec cannot be
    /// opened.
    pub fn video_decoder(&self, track: Track) -> Result<FfmpegVideoDecoder> {
        let stream = self
            .stream(track)
            .ok_or_else(|| Error::Media(format!("No stream for {track}")))?;
        FfmpegVideoDecoder::from_parameters(stream.parameters(), stream.time_base())
    }

    fn stream(&self, track: Track) -> Option<ffmpeg_next::format::stream::Stream<'_>> {
        let index = usize::try_from(track.0).ok()?;
        self.state.input.stream(index)
    }

    fn time_base(&self, track: Track) -> std::result::Result<ffmpeg_next::Rational, DemuxerError> {
        self.stream(track)
            .map(|stream| stream.time_base())
            .ok_or(DemuxerError::UnknownTrack(track.0))
    }

    /// Reads packets until one belongs to `track`.
    fn read_sample(&mut self, track: Track) -> std::result::Result<Option<Sample>, DemuxerError> {
        let time_base = self.time_base(track)?;

        loop {
            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.state.input) {
                Ok(()) => {}
                Err(ffmpeg_next::Error::Eof) => return Ok(None),
                Err(ffmpeg_next::Error::InvalidData) => {
                    return Err(DemuxerError::Corrupted("invalid packet data".to_string()))
                }
                Err(e) => return Err(DemuxerError::Io(e.to_string())),
            }

            if packet.stream() as u64 != track.0 {
                continue;
            }

            let ticks = packet.pts().or_else(|| packet.dts()).unwrap_or(0);
            let timestamp = Duration::from_secs_f64(ticks_to_secs(ticks, time_base));
            let data = packet.data().map(<[u8]>::to_vec).unwrap_or_default();
            return Ok(Some(Sample::new(data, timestamp, packet.is_key())));
        }
    }
}

impl Demuxer for FfmpegDemuxer {
    fn next_sample(&mut self, track: Track) -> std::result::Result<Option<Sample>, DemuxerError> {
        let sample = match self.peeked.take() {
            Some(sample) => Some(sample),
            None => self.read_sample(track)?,
        };
        if let Some(sample) = &sample {
            self.read_position = sample.timestamp;
        }
        Ok(sample)
    }

    fn seek_to_most_recent_keyframe(
        &mut self,
        track: Track,
        timestamp: Duration,
        _earliest_available_sample: Option<Duration>,
    ) -> std::result::Result<Option<Duration>, DemuxerError> {
        // Format-level seeks use AV_TIME_BASE (microseconds)
        let target = secs_to_ticks(
            timestamp.as_secs_f64(),
            ffmpeg_next::Rational::new(1, ffmpeg_next::ffi::AV_TIME_BASE),
        );

        if let Err(e) = self.state.input.seek(target, ..target) {
            return Err(if timestamp < self.read_position {
                DemuxerError::CannotSeekBackward
            } else {
                DemuxerError::Io(format!("Seek failed: {e}"))
            });
        }

        self.peeked = self.read_sample(track)?;
        let keyframe = self
            .peeked
            .as_ref()
            .map_or(timestamp, |sample| sample.timestamp);
        self.read_position = keyframe;
        Ok(Some(keyframe))
    }

    fn track_duration(&mut self, track: Track) -> std::result::Result<Duration, DemuxerError> {
        let stream = self
            .stream(track)
            .ok_or(DemuxerError::UnknownTrack(track.0))?;

        if stream.duration() > 0 {
            return Ok(Duration::from_secs_f64(ticks_to_secs(
                stream.duration(),
                stream.time_base(),
            )));
        }

        let container = self.state.input.duration();
        if container > 0 {
            return Ok(Duration::from_secs_f64(ticks_to_secs(
                container,
                ffmpeg_next::Rational::new(1, ffmpeg_next::ffi::AV_TIME_BASE),
            )));
        }

        Err(DemuxerError::Corrupted("unknown duration".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify Send is implemented
    fn assert_send<T: Send>() {}

    #[test]
    fn demuxer_is_send() {
        assert_send::<FfmpegDemuxer>();
    }

    #[test]
    fn open_fails_for_missing_file() {
        let result = FfmpegDemuxer::open(Path::new("/nonexistent/clip.mp4"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
