// SPDX-License-Identifier: MPL-2.0
//! `lens_playback` schedules decoding and presentation of a video track on a
//! single-threaded event loop.
//!
//! It pulls encoded samples from a demuxer, feeds them to a decoder through a
//! small bounded queue, and hands each picture to the host when its media
//! timestamp comes due. Playback can be paused, resumed, and seeked, and it
//! buffers when the decoder falls behind.

#![doc(html_root_url = "https://docs.rs/lens_playback/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
#[cfg(feature = "ffmpeg")]
pub mod infrastructure;
pub mod video_player;
