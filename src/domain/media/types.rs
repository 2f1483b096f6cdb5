// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure data exchanged between the demuxer, the decoder
//! and the playback core. None of them know how they will be displayed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Raw image data without presentation dependencies.
///
/// This is the domain representation of a decoded picture, containing only
/// the pure pixel data. Hosts convert this to whatever handle their renderer
/// needs.
///
/// # Example
///
/// ```
/// use lens_playback::domain::media::RawImage;
/// use std::sync::Arc;
///
/// let pixels = vec![255u8; 100 * 100 * 4]; // 100x100 RGBA
/// let image = RawImage::new(100, 100, Arc::new(pixels));
///
/// assert_eq!(image.width(), 100);
/// assert_eq!(image.height(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    rgba_bytes: Arc<Vec<u8>>,
}

impl RawImage {
    /// Creates a new `RawImage` from dimensions and RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Self {
        let expected_len = (width as usize) * (height as usize) * 4;
        assert_eq!(
            rgba_bytes.len(),
            expected_len,
            "RGBA data length mismatch: expected {expected_len}, got {}",
            rgba_bytes.len()
        );

        Self {
            width,
            height,
            rgba_bytes,
        }
    }

    /// Creates a new `RawImage` from dimensions and owned RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Self {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba_bytes == other.rgba_bytes
    }
}

impl Eq for RawImage {}

/// Identifier of a track inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Track(pub u64);

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track #{}", self.0)
    }
}

/// One encoded unit read from a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Encoded payload handed to the decoder as-is.
    pub data: Vec<u8>,
    /// Presentation timestamp relative to the start of the stream.
    pub timestamp: Duration,
    /// Whether the decoder can start decoding from this sample.
    pub is_keyframe: bool,
}

impl Sample {
    /// Creates a sample.
    #[must_use]
    pub fn new(data: Vec<u8>, timestamp: Duration, is_keyframe: bool) -> Self {
        Self {
            data,
            timestamp,
            is_keyframe,
        }
    }
}

/// A decoded picture together with its presentation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Shared pixel data.
    pub image: Arc<RawImage>,
    /// Presentation timestamp relative to the start of the stream.
    pub timestamp: Duration,
}

impl DecodedFrame {
    #[must_use]
    pub fn new(image: RawImage, timestamp: Duration) -> Self {
        Self {
            image: Arc::new(image),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_image_creation() {
        let pixels = vec![0u8; 10 * 10 * 4];
        let image = RawImage::from_rgba(10, 10, pixels);

        assert_eq!(image.width(), 10);
        assert_eq!(image.height(), 10);
        assert_eq!(image.rgba_bytes().len(), 400);
    }

    #[test]
    #[should_panic(expected = "RGBA data length mismatch")]
    fn test_raw_image_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let _ = RawImage::from_rgba(10, 10, pixels);
    }

    #[test]
    fn test_raw_image_equality() {
        let image1 = RawImage::from_rgba(2, 2, vec![0u8; 16]);
        let image2 = RawImage::from_rgba(2, 2, vec![0u8; 16]);
        let image3 = RawImage::from_rgba(2, 2, vec![1u8; 16]);

        assert_eq!(image1, image2);
        assert_ne!(image1, image3);
    }

    #[test]
    fn test_decoded_frame_shares_pixels_on_clone() {
        let frame = DecodedFrame::new(
            RawImage::from_rgba(1, 1, vec![9, 9, 9, 255]),
            Duration::from_millis(40),
        );
        let copy = frame.clone();

        assert!(Arc::ptr_eq(&frame.image, &copy.image));
        assert_eq!(copy.timestamp, Duration::from_millis(40));
    }

    #[test]
    fn test_track_display() {
        assert_eq!(Track(2).to_string(), "track #2");
    }
}
