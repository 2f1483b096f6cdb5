// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports consumed by the playback core.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The video player drives the ports without knowing their implementations

pub mod port;
