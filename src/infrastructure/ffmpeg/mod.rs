// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapters implementing the [`Demuxer`] and [`VideoDecoder`] ports.
//!
//! # Design Notes
//!
//! - [`FfmpegDemuxer`] owns the input context and hands out packets as
//!   domain [`Sample`](crate::domain::media::Sample)s
//! - [`FfmpegVideoDecoder`] owns the codec context and converts every
//!   picture to RGBA
//! - Both are `Send` so a manager built from them can move to its event
//!   loop thread
//!
//! [`Demuxer`]: crate::application::port::Demuxer
//! [`VideoDecoder`]: crate::application::port::VideoDecoder

mod decoder;
mod demuxer;

pub use decoder::FfmpegVideoDecoder;
pub use demuxer::FfmpegDemuxer;

use crate::error::{Error, Result};
use crate::video_player::{PlaybackEventSink, PlaybackManager};
use std::path::Path;
use std::sync::Once;

static FFMPEG_INIT: Once = Once::new();

/// Initializes `FFmpeg` once per process.
///
/// # Errors
///
/// Returns an error if `FFmpeg` fails to initialize.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Media(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // Set log level to ERROR to suppress warning messages
        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Converts a stream timestamp to seconds.
#[allow(clippy::cast_precision_loss)]
fn ticks_to_secs(ticks: i64, time_base: ffmpeg_next::Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    ticks.max(0) as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Converts seconds to a stream timestamp.
#[allow(clippy::cast_possible_truncation)]
fn secs_to_ticks(secs: f64, time_base: ffmpeg_next::Rational) -> i64 {
    if time_base.numerator() == 0 {
        return 0;
    }
    (secs * f64::from(time_base.denominator()) / f64::from(time_base.numerator())).round() as i64
}

impl PlaybackManager {
    /// Opens `path` and builds a stopped manager for its best video stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, has no video stream,
    /// or its codec is not supported.
    pub fn from_file(
        path: impl AsRef<Path>,
        events: impl PlaybackEventSink + 'static,
    ) -> Result<Self> {
        let demuxer = FfmpegDemuxer::open(path.as_ref())?;
        let track = demuxer
            .best_video_track()
            .ok_or_else(|| Error::Media("No video stream found".to_string()))?;
        let decoder = demuxer.video_decoder(track)?;
        Ok(Self::new(demuxer, track, decoder, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video_player::PlaybackEvent;

    #[test]
    fn ticks_round_trip_through_seconds() {
        let time_base = ffmpeg_next::Rational::new(1, 90_000);
        let secs = ticks_to_secs(180_000, time_base);
        assert!((secs - 2.0).abs() < f64::EPSILON);
        assert_eq!(secs_to_ticks(secs, time_base), 180_000);
    }

    #[test]
    fn negative_ticks_clamp_to_zero() {
        let time_base = ffmpeg_next::Rational::new(1, 1000);
        assert!(ticks_to_secs(-40, time_base).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_time_base_yields_zero() {
        assert!(ticks_to_secs(10, ffmpeg_next::Rational::new(1, 0)).abs() < f64::EPSILON);
        assert_eq!(secs_to_ticks(1.0, ffmpeg_next::Rational::new(0, 1)), 0);
    }

    #[test]
    fn from_file_fails_for_missing_file() {
        let result = PlaybackManager::from_file("/nonexistent/clip.mp4", |_: PlaybackEvent| {});
        assert!(result.is_err());
    }
}
