//! The serial call event loop.
//!
//! One logical stream of telephony events drives the controller;
//! classification and session changes happen strictly in delivery
//! order. The controller sits behind a single mutex — the only
//! mutual-exclusion boundary the low event rate needs — shared with
//! the delayed-start task.

use crate::{AppResult, TelephonyEvent, capture::DesktopCaptureBackend};

use std::{sync::Arc, time::Duration};

use callkeeper_core::{
    AlwaysGranted, CallEventKind, CallRecordingController, CallStateEvent, CallStateTracker,
    ClassifiedCallEvent, NoCallLog, RecordingIndex,
};
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

type Controller = CallRecordingController<DesktopCaptureBackend, AlwaysGranted>;

/// Main application state.
///
/// Owns the one controller instance for the process lifetime; the
/// telephony feed is registered at startup and torn down when the
/// event channel closes.
pub struct App {
    pub(crate) controller: Arc<Mutex<Controller>>,
    pub(crate) tracker: CallStateTracker,
    pub(crate) index: RecordingIndex<NoCallLog>,
    pub(crate) event_rx: mpsc::Receiver<TelephonyEvent>,
    pub(crate) shutdown_rx: watch::Receiver<bool>,
    pub(crate) start_delay: Duration,
    /// Delayed-start task for the current call, aborted when the call
    /// ends inside the delay window.
    pending_start: Option<JoinHandle<()>>,
}

impl App {
    pub(crate) fn new(
        controller: Arc<Mutex<Controller>>,
        index: RecordingIndex<NoCallLog>,
        event_rx: mpsc::Receiver<TelephonyEvent>,
        shutdown_rx: watch::Receiver<bool>,
        start_delay: Duration,
    ) -> Self {
        Self {
            controller,
            tracker: CallStateTracker::new(),
            index,
            event_rx,
            shutdown_rx,
            start_delay,
            pending_start: None,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Callkeeper starting");

        self.log_index_summary().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    info!("Shutdown requested");
                    break;
                }

                maybe_event = self.event_rx.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_telephony_event(event).await,
                        None => {
                            info!("Telephony feed closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        // Teardown: cancel any start still in its delay window and stop
        // an active capture before exiting.
        self.abort_pending_start();
        self.controller.lock().await.stop();

        info!("Callkeeper shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_telephony_event(&mut self, event: TelephonyEvent) {
        match event {
            TelephonyEvent::NumberUpdated(number) => {
                self.controller
                    .lock()
                    .await
                    .set_phone_number(Some(&number));
            }
            TelephonyEvent::StateChanged(CallStateEvent { state, number }) => {
                if let Some(n) = &number {
                    self.controller.lock().await.set_phone_number(Some(n));
                }

                let classified = self.tracker.observe(state);
                match classified.kind {
                    CallEventKind::Ringing => {
                        if let Err(e) = self.controller.lock().await.handle_event(classified) {
                            warn!(error = ?e, "Failed to handle ringing event");
                        }
                    }
                    CallEventKind::Answered => self.schedule_start(classified),
                    CallEventKind::Ended => {
                        self.abort_pending_start();
                        if let Err(e) = self.controller.lock().await.handle_event(classified) {
                            warn!(error = ?e, "Failed to handle call end");
                        }
                    }
                }
            }
        }
    }

    /// Start recording after the configured delay window.
    ///
    /// The delay lets the call audio path stabilize; an `Ended` inside
    /// the window aborts the task, so a call shorter than the delay is
    /// never recorded at all.
    fn schedule_start(&mut self, classified: ClassifiedCallEvent) {
        self.abort_pending_start();

        let session_id = Uuid::new_v4();
        let controller = Arc::clone(&self.controller);
        let delay = self.start_delay;

        self.pending_start = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match controller.lock().await.handle_event(classified) {
                Ok(()) => info!(session_id = %session_id, "Recording start handled"),
                Err(e) => {
                    // Terminal for this call: no retry, a later call may
                    // succeed independently.
                    error!(session_id = %session_id, error = ?e, "Failed to start recording");
                }
            }
        }));
    }

    fn abort_pending_start(&mut self) {
        if let Some(pending) = self.pending_start.take() {
            pending.abort();
        }
    }

    async fn log_index_summary(&self) {
        let index = self.index.clone();
        let directory = index.directory().to_path_buf();

        // Directory scans are read-only and must not block event
        // processing.
        let scanned = tokio::task::spawn_blocking(move || index.scan()).await;
        match scanned {
            Ok(Ok(records)) => {
                info!(
                    count = records.len(),
                    directory = ?directory,
                    "Existing recordings indexed"
                );
            }
            Ok(Err(e)) => warn!(error = ?e, "Failed to scan recording directory"),
            Err(e) => warn!(error = ?e, "Recording scan task failed"),
        }
    }
}
