// SPDX-License-Identifier: MPL-2.0
//! Media domain types: pictures, samples and tracks.

mod types;

pub use types::{DecodedFrame, RawImage, Sample, Track};
