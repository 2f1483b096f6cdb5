// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for decode scheduling values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// DecodeInterval
// =============================================================================

/// Decode interval bounds (1 to 250 milliseconds).
pub mod decode_interval_bounds {
    /// Minimum decode interval in milliseconds.
    pub const MIN_MS: u64 = 1;
    /// Maximum decode interval in milliseconds.
    pub const MAX_MS: u64 = 250;
    /// Default decode interval in milliseconds (one frame at 60 fps).
    pub const DEFAULT_MS: u64 = 16;
}

/// Period of the decode task while the frame queue is at least half full.
///
/// Also used as the retry interval of the presentation task when it finds
/// the queue empty right after presenting a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeInterval(u64);

impl DecodeInterval {
    /// Creates a new decode interval, clamping to valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(
            decode_interval_bounds::MIN_MS,
            decode_interval_bounds::MAX_MS,
        ))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DecodeInterval {
    fn default() -> Self {
        Self(decode_interval_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// SampleBudget
// =============================================================================

/// Sample budget bounds (1 to 64 samples per decode tick).
pub mod sample_budget_bounds {
    /// Minimum number of samples submitted per tick.
    pub const MIN: u32 = 1;
    /// Maximum number of samples submitted per tick.
    pub const MAX: u32 = 64;
    /// Default budget, deep enough for common B-frame reorder depths.
    pub const DEFAULT: u32 = 16;
}

/// Maximum number of samples a single decode tick submits while the decoder
/// keeps returning no picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBudget(u32);

impl SampleBudget {
    /// Creates a new sample budget, clamping to valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(sample_budget_bounds::MIN, sample_budget_bounds::MAX))
    }

    /// Returns the value as u32.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for SampleBudget {
    fn default() -> Self {
        Self(sample_budget_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
