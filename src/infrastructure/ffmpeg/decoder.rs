// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` codec wrapper implementing the [`VideoDecoder`] port.

use super::{secs_to_ticks, ticks_to_secs};
use crate::application::port::VideoDecoder;
use crate::domain::error::DecoderError;
use crate::domain::media::{DecodedFrame, RawImage, Sample};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::time::Duration;

/// `FFmpeg`-based video decoder producing RGBA pictures.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync` due to internal mutable state.
pub struct FfmpegVideoDecoder {
    state: DecoderState,
    time_base: ffmpeg_next::Rational,
    /// Pictures received but not yet handed out, oldest first.
    ready: VecDeque<DecodedFrame>,
    /// End of input was signalled; cleared by `reset`.
    eof_sent: bool,
}

/// Internal decoder state that holds `FFmpeg` contexts.
struct DecoderState {
    decoder: ffmpeg_next::decoder::Video,
    /// Created on the first picture, recreated if the picture size changes.
    scaler: Option<ffmpeg_next::software::scaling::Context>,
}

// SAFETY: DecoderState contains FFmpeg types with internal raw pointers.
// These are safe to send between threads because:
// 1. FFmpeg's decoder and scaler contexts are safe for single-threaded access per instance
// 2. We maintain exclusive access through Rust's ownership model
// 3. The decoder is only used from one thread at a time (move semantics)
unsafe impl Send for DecoderState {}

impl FfmpegVideoDecoder {
    /// Opens a decoder for a stream's codec parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec is unknown or cannot be opened.
    pub fn from_parameters(
        parameters: ffmpeg_next::codec::Parameters,
        time_base: ffmpeg_next::Rational,
    ) -> Result<Self> {
        let context_decoder = ffmpeg_next::codec::context::Context::from_parameters(parameters)
            .map_err(|e| Error::Media(format!("Failed to create codec context: {e}")))?;

        let decoder = context_decoder
            .decoder()
            .video()
            .map_err(|e| Error::Media(format!("Failed to create video decoder: {e}")))?;

        Ok(Self {
            state: DecoderState {
                decoder,
                scaler: None,
            },
            time_base,
            ready: VecDeque::new(),
            eof_sent: false,
        })
    }

    /// Extracts RGBA data from a scaled frame, handling stride correctly.
    fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let data = frame.data(0);
        let stride = frame.stride(0);

        let mut rgba_bytes = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let row_start = y * stride;
            rgba_bytes.extend_from_slice(&data[row_start..row_start + width * 4]);
        }

        rgba_bytes
    }

    /// Scales a decoded picture to RGBA.
    fn convert(
        &mut self,
        decoded: &ffmpeg_next::frame::Video,
    ) -> std::result::Result<DecodedFrame, DecoderError> {
        let (width, height, format) = (decoded.width(), decoded.height(), decoded.format());

        let stale = self.state.scaler.as_ref().is_none_or(|scaler| {
            let input = scaler.input();
            input.width != width || input.height != height || input.format != format
        });
        if stale {
            let scaler = ffmpeg_next::software::scaling::Context::get(
                format,
                width,
                height,
                ffmpeg_next::format::Pixel::RGBA,
                width,
                height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )
            .map_err(|e| DecoderError::Memory(format!("Failed to create scaler: {e}")))?;
            self.state.scaler = Some(scaler);
        }

        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        if let Some(scaler) = self.state.scaler.as_mut() {
            scaler
                .run(decoded, &mut rgba_frame)
                .map_err(|e| DecoderError::Invalid(format!("Scaling failed: {e}")))?;
        }

        let ticks = decoded.timestamp().or_else(|| decoded.pts()).unwrap_or(0);
        let timestamp = Duration::from_secs_f64(ticks_to_secs(ticks, self.time_base));
        let image = RawImage::from_rgba(
            rgba_frame.width(),
            rgba_frame.height(),
            Self::extract_rgba_data(&rgba_frame),
        );

        Ok(DecodedFrame::new(image, timestamp))
    }

    /// Moves every picture the codec has ready into `ready`.
    ///
    /// Returns whether anything was received.
    fn receive_pending(&mut self) -> std::result::Result<bool, DecoderError> {
        let mut received = false;
        loop {
            let mut decoded = ffmpeg_next::frame::Video::empty();
            if self.state.decoder.receive_frame(&mut decoded).is_err() {
                return Ok(received);
            }
            let frame = self.convert(&decoded)?;
            self.ready.push_back(frame);
            received = true;
        }
    }
}

fn send_error(e: ffmpeg_next::Error) -> DecoderError {
    match e {
        ffmpeg_next::Error::InvalidData => DecoderError::Corrupted(format!("Packet send failed: {e}")),
        ffmpeg_next::Error::PatchWelcome | ffmpeg_next::Error::DecoderNotFound => {
            DecoderError::NotImplemented(e.to_string())
        }
        _ => DecoderError::Invalid(format!("Packet send failed: {e}")),
    }
}

impl VideoDecoder for FfmpegVideoDecoder {
    fn submit(&mut self, sample: Sample) -> std::result::Result<Option<DecodedFrame>, DecoderError> {
        let mut packet = ffmpeg_next::Packet::copy(&sample.data);
        packet.set_pts(Some(secs_to_ticks(
            sample.timestamp.as_secs_f64(),
            self.time_base,
        )));
        if sample.is_keyframe {
            packet.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        loop {
            match self.state.decoder.send_packet(&packet) {
                Ok(()) => break,
                // Output is full: collect it, then resend
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {
                    if !self.receive_pending()? {
                        return Err(DecoderError::Invalid(
                            "decoder refused packet with no output pending".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(send_error(e)),
            }
        }

        self.receive_pending()?;
        Ok(self.ready.pop_front())
    }

    fn drain(&mut self) -> std::result::Result<Option<DecodedFrame>, DecoderError> {
        if let Some(frame) = self.ready.pop_front() {
            return Ok(Some(frame));
        }
        if !self.eof_sent {
            self.eof_sent = true;
            self.state
                .decoder
                .send_eof()
                .map_err(|e| DecoderError::Invalid(format!("Flush failed: {e}")))?;
        }

        let mut decoded = ffmpeg_next::frame::Video::empty();
        match self.state.decoder.receive_frame(&mut decoded) {
            Ok(()) => self.convert(&decoded).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn reset(&mut self) {
        self.state.decoder.flush();
        self.ready.clear();
        self.eof_sent = false;
    }
}
