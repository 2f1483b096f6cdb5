// SPDX-License-Identifier: MPL-2.0
//! Wall-clock port.
//!
//! The playback manager never calls `Instant::now()` directly; it asks a
//! [`Clock`] so tests can drive time by hand.

use std::time::Instant;

/// Source of monotonic wall-clock time.
pub trait Clock: Send {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
