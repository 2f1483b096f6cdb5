//! This module handles playback configuration, loading and saving the
//! scheduling preferences stored in a `playback.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use lens_playback::config::{self, PlaybackConfig, SeekModePreference};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.default_seek_mode = Some(SeekModePreference::Fast);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::domain::video::{DecodeInterval, SampleBudget, SeekMode};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "playback.toml";
const APP_NAME: &str = "LensPlayback";

/// Seek precision as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekModePreference {
    Accurate,
    Fast,
}

impl From<SeekModePreference> for SeekMode {
    fn from(preference: SeekModePreference) -> Self {
        match preference {
            SeekModePreference::Accurate => SeekMode::Accurate,
            SeekModePreference::Fast => SeekMode::Fast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub decode_interval_ms: Option<u64>,
    #[serde(default)]
    pub decode_sample_budget: Option<u32>,
    #[serde(default)]
    pub default_seek_mode: Option<SeekModePreference>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            decode_interval_ms: Some(defaults::DEFAULT_DECODE_INTERVAL_MS),
            decode_sample_budget: Some(defaults::DEFAULT_DECODE_SAMPLE_BUDGET),
            default_seek_mode: Some(defaults::DEFAULT_SEEK_MODE),
        }
    }
}

impl PlaybackConfig {
    /// Decode task period, clamped to its valid range.
    #[must_use]
    pub fn decode_interval(&self) -> DecodeInterval {
        self.decode_interval_ms
            .map_or_else(DecodeInterval::default, DecodeInterval::from_millis)
    }

    /// Per-tick sample budget, clamped to its valid range.
    #[must_use]
    pub fn sample_budget(&self) -> SampleBudget {
        self.decode_sample_budget
            .map_or_else(SampleBudget::default, SampleBudget::new)
    }

    #[must_use]
    pub fn seek_mode(&self) -> SeekMode {
        self.default_seek_mode
            .unwrap_or(defaults::DEFAULT_SEEK_MODE)
            .into()
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<PlaybackConfig> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(PlaybackConfig::default())
}

pub fn save(config: &PlaybackConfig) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<PlaybackConfig> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid playback config, using defaults");
            Ok(PlaybackConfig::default())
        }
    }
}

pub fn save_to_path(config: &PlaybackConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
