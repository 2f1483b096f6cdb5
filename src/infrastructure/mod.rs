// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external dependencies like `FFmpeg`.
//!
//! # Available Adapters
//!
//! - [`ffmpeg`]: Container reading and video decoding via `FFmpeg` (implements
//!   [`Demuxer`] and [`VideoDecoder`])
//!
//! [`Demuxer`]: crate::application::port::Demuxer
//! [`VideoDecoder`]: crate::application::port::VideoDecoder

pub mod ffmpeg;

// Re-export main types for convenience
pub use ffmpeg::{FfmpegDemuxer, FfmpegVideoDecoder};
