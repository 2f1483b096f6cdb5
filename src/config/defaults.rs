// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used when a setting is absent from `playback.toml`. Constants are
//! organized by category.
//!
//! # Categories
//!
//! - **Decode Scheduling**: Decode task period and per-tick sample budget
//! - **Seeking**: Default seek precision

use crate::domain::video::newtypes::{decode_interval_bounds, sample_budget_bounds};

// ==========================================================================
// Decode Scheduling Defaults
// ==========================================================================

/// Default decode task period in milliseconds.
pub const DEFAULT_DECODE_INTERVAL_MS: u64 = decode_interval_bounds::DEFAULT_MS;

/// Minimum decode task period in milliseconds.
pub const MIN_DECODE_INTERVAL_MS: u64 = decode_interval_bounds::MIN_MS;

/// Maximum decode task period in milliseconds.
pub const MAX_DECODE_INTERVAL_MS: u64 = decode_interval_bounds::MAX_MS;

/// Default number of samples a decode tick may submit without output.
pub const DEFAULT_DECODE_SAMPLE_BUDGET: u32 = sample_budget_bounds::DEFAULT;

/// Minimum per-tick sample budget.
pub const MIN_DECODE_SAMPLE_BUDGET: u32 = sample_budget_bounds::MIN;

/// Maximum per-tick sample budget.
pub const MAX_DECODE_SAMPLE_BUDGET: u32 = sample_budget_bounds::MAX;

// ==========================================================================
// Seeking Defaults
// ==========================================================================

/// Seeks land exactly on the requested timestamp unless configured otherwise.
pub const DEFAULT_SEEK_MODE: super::SeekModePreference = super::SeekModePreference::Accurate;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_DECODE_INTERVAL_MS > 0);
    assert!(MAX_DECODE_INTERVAL_MS >= MIN_DECODE_INTERVAL_MS);
    assert!(DEFAULT_DECODE_INTERVAL_MS >= MIN_DECODE_INTERVAL_MS);
    assert!(DEFAULT_DECODE_INTERVAL_MS <= MAX_DECODE_INTERVAL_MS);

    assert!(MIN_DECODE_SAMPLE_BUDGET > 0);
    assert!(MAX_DECODE_SAMPLE_BUDGET >= MIN_DECODE_SAMPLE_BUDGET);
    assert!(DEFAULT_DECODE_SAMPLE_BUDGET >= MIN_DECODE_SAMPLE_BUDGET);
    assert!(DEFAULT_DECODE_SAMPLE_BUDGET <= MAX_DECODE_SAMPLE_BUDGET);
};
