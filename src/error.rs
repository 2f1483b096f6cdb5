// SPDX-License-Identifier: MPL-2.0
use crate::domain::error::FatalPlaybackError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// A media file could not be opened for playback (no video stream,
    /// unsupported codec, scaler setup failure).
    #[error("Media Error: {0}")]
    Media(String),

    #[error("Playback Error: {0}")]
    Playback(#[from] FatalPlaybackError),

    /// The playback driver is no longer receiving commands.
    #[error("Playback driver is not running")]
    DriverClosed,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
