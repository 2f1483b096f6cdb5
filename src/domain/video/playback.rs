// SPDX-License-Identifier: MPL-2.0
//! Playback state tags and seek modes.
//!
//! [`PlaybackState`] is the plain, copyable view of the state machine that
//! hosts receive in state-change events. The state machine itself lives in
//! the video player and carries per-state data this tag does not expose.

use std::fmt;

/// Represents the current playback state of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing is scheduled. Initial state and the terminal state after a
    /// fatal error or end of stream.
    #[default]
    Stopped,
    /// Frames are decoded and presented on time.
    Playing,
    /// Presentation is frozen at the current position.
    Paused,
    /// Presentation is suspended while the frame queue refills.
    Buffering,
    /// The decoder is catching up to a new position.
    Seeking,
}

impl PlaybackState {
    /// Returns true if frames are being shown on time.
    ///
    /// Only `Playing` presents. Whether playback is *meant* to run (which
    /// also covers buffering and a seek that will resume) is answered by the
    /// manager's `is_playing`, since this tag does not carry seek intent.
    #[must_use]
    pub fn is_presenting(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns the lowercase name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Buffering => "buffering",
            Self::Seeking => "seeking",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How precisely a seek lands on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekMode {
    /// Decode from the keyframe and discard every frame before the target.
    #[default]
    Accurate,
    /// Present the first frame decoded after the keyframe.
    Fast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(PlaybackState::default(), PlaybackState::Stopped);
    }

    #[test]
    fn test_only_playing_presents() {
        assert!(PlaybackState::Playing.is_presenting());
        assert!(!PlaybackState::Buffering.is_presenting());
        assert!(!PlaybackState::Seeking.is_presenting());
        assert!(!PlaybackState::Paused.is_presenting());
        assert!(!PlaybackState::Stopped.is_presenting());
    }

    #[test]
    fn test_display_matches_log_name() {
        assert_eq!(PlaybackState::Buffering.to_string(), "buffering");
        assert_eq!(PlaybackState::Seeking.as_str(), "seeking");
    }

    #[test]
    fn test_default_seek_mode_is_accurate() {
        assert_eq!(SeekMode::default(), SeekMode::Accurate);
    }
}
