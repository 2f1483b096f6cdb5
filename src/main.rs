// SPDX-License-Identifier: MPL-2.0
use lens_playback::config;
use lens_playback::domain::error::FatalPlaybackError;
use lens_playback::domain::video::{PlaybackState, SeekMode};
use lens_playback::error::{Error, Result};
use lens_playback::video_player::{
    drive, ChannelSink, PlaybackEvent, PlaybackHandle, PlaybackManager, PlaybackSettings,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Usage: lens-play [OPTIONS] <FILE>

Options:
  --seek <SECS>     Start playback at this position
  --fast            Land seeks on the nearest keyframe
  --config <PATH>   Read settings from this file
  -h, --help        Print help
";

struct Args {
    file: PathBuf,
    seek: Option<f64>,
    fast: bool,
    config: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let seek = args.opt_value_from_str("--seek")?;
    let fast = args.contains("--fast");
    let config = args.opt_value_from_str("--config")?;
    let file = args.free_from_str()?;

    Ok(Some(Args {
        file,
        seek,
        fast,
        config,
    }))
}

/// Logs playback events until playback stops, then releases the driver.
async fn watch(
    mut events: tokio::sync::mpsc::UnboundedReceiver<PlaybackEvent>,
    handle: PlaybackHandle,
) -> (u64, Option<FatalPlaybackError>) {
    let mut presented = 0;
    let mut fatal = None;

    while let Some(event) = events.recv().await {
        match event {
            PlaybackEvent::FramePresented { image, timestamp } => {
                presented += 1;
                info!(
                    timestamp_ms = timestamp.as_millis(),
                    width = image.width(),
                    height = image.height(),
                    "frame"
                );
            }
            PlaybackEvent::DecoderError(err) => warn!(error = %err, "decode error"),
            PlaybackEvent::StateChanged(PlaybackState::Stopped) => {
                info!("playback stopped");
                break;
            }
            PlaybackEvent::StateChanged(state) => info!(%state, "state changed"),
            PlaybackEvent::FatalError(err) => fatal = Some(err),
        }
    }

    // A fatal error is dispatched right after the stop
    while let Ok(event) = events.try_recv() {
        if let PlaybackEvent::FatalError(err) = event {
            fatal = Some(err);
        }
    }
    drop(handle);

    (presented, fatal)
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    let mode = if args.fast {
        SeekMode::Fast
    } else {
        config.seek_mode()
    };

    let (sink, events) = ChannelSink::channel();
    let mut manager =
        PlaybackManager::from_file(&args.file, sink)?.with_settings(PlaybackSettings::from(&config));
    match manager.duration() {
        Ok(duration) => info!(file = %args.file.display(), duration_ms = duration.as_millis(), "opened"),
        Err(err) => warn!(error = %err, "unknown duration"),
    }

    let (handle, commands) = PlaybackHandle::channel();
    if let Some(secs) = args.seek {
        handle.seek(Duration::from_secs_f64(secs.max(0.0)), mode)?;
    }
    handle.resume()?;

    let (manager, (presented, fatal)) = tokio::join!(drive(manager, commands), watch(events, handle));
    info!(
        presented,
        skipped = manager.skipped_frame_count(),
        "playback finished"
    );

    match fatal {
        Some(err) => Err(Error::Playback(err)),
        None => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("lens-play: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "lens-play failed");
            ExitCode::FAILURE
        }
    }
}
