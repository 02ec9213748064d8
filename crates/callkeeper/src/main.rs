//! Callkeeper: call-state-driven recording service.

mod app;
mod capture;
mod config;
mod error;
mod telephony;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    telephony::TelephonyEvent,
};

use crate::{capture::DesktopCaptureBackend, config::Config, telephony::spawn_stdin_feed};

use std::{sync::Arc, time::Duration};

use callkeeper_core::{
    AlwaysGranted, CAPTURE_PROFILE, CallRecordingController, NoCallLog, RecordingIndex,
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info};

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("callkeeper=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let recordings_dir = match config.recordings_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve recording directory: {:?}", e);
            std::process::exit(1);
        }
    };

    let start_delay = Duration::from_millis(config.recording.start_delay_ms);
    let max_duration = Duration::from_secs(config.recording.max_duration_secs);

    let backend = DesktopCaptureBackend::new(&config.capture, max_duration);
    let controller = Arc::new(Mutex::new(CallRecordingController::new(
        backend,
        AlwaysGranted,
        recordings_dir.clone(),
        CAPTURE_PROFILE,
        start_delay,
    )));
    let index = RecordingIndex::new(recordings_dir, NoCallLog);

    let (event_tx, event_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Register the telephony feed once for the process lifetime.
    let feed = spawn_stdin_feed(event_tx);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received");
            let _ = shutdown_tx.send(true);
        }
    });

    let app = App::new(controller, index, event_rx, shutdown_rx, start_delay);
    if let Err(e) = app.run().await {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }

    // The feed task may still be blocked on stdin; it is cleaned up on
    // process exit.
    feed.abort();
}
