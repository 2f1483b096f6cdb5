// SPDX-License-Identifier: MPL-2.0
//! Tokio event loop for a [`PlaybackManager`].
//!
//! [`drive`] owns the manager and runs it on the current task: it sleeps
//! until the next task deadline and wakes early for host commands arriving
//! through a [`PlaybackHandle`]. Everything stays on one task, so control
//! calls and task ticks never interleave.

use super::manager::PlaybackManager;
use crate::domain::video::SeekMode;
use crate::error::{Error, Result};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::trace;

/// Commands sent from the host to a driven manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Resume,
    Pause,
    Restart,
    Seek { timestamp: Duration, mode: SeekMode },
    Stop,
}

/// Cloneable handle for controlling a driven manager.
///
/// The driver returns once every handle is dropped.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<PlaybackCommand>,
}

impl PlaybackHandle {
    /// Creates a handle and the command receiver to pass to [`drive`].
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlaybackCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (Self { commands }, receiver)
    }

    /// Sends a command to the driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DriverClosed`] if the driver has returned.
    pub fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::DriverClosed)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(PlaybackCommand::Resume)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause)
    }

    pub fn restart(&self) -> Result<()> {
        self.send(PlaybackCommand::Restart)
    }

    pub fn seek(&self, timestamp: Duration, mode: SeekMode) -> Result<()> {
        self.send(PlaybackCommand::Seek { timestamp, mode })
    }

    pub fn stop(&self) -> Result<()> {
        self.send(PlaybackCommand::Stop)
    }
}

impl PlaybackManager {
    /// Applies a host command.
    pub fn apply(&mut self, command: PlaybackCommand) {
        trace!(?command, "applying playback command");
        match command {
            PlaybackCommand::Resume => self.resume(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Restart => self.restart(),
            PlaybackCommand::Seek { timestamp, mode } => self.seek(timestamp, mode),
            PlaybackCommand::Stop => self.stop(),
        }
    }
}

/// Runs `manager` until the command channel closes, then hands it back.
///
/// Commands are handled before due tasks when both are ready.
pub async fn drive(
    mut manager: PlaybackManager,
    mut commands: mpsc::UnboundedReceiver<PlaybackCommand>,
) -> PlaybackManager {
    loop {
        let deadline = manager.next_deadline();
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(command) => manager.apply(command),
                None => break,
            },
            () = sleep_until(deadline) => manager.run_due_tasks(),
        }
    }

    trace!(state = %manager.state(), "playback driver finished");
    manager
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
