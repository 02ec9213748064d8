//! The call-recording start/stop policy.

use crate::{
    RecordError,
    call::{CallDirection, CallEventKind, ClassifiedCallEvent},
    capture::{self, CaptureBackend, CaptureSession, EncodingProfile, SOURCE_PRIORITY},
    recording::{RecordingSession, RecordingStatus},
    storage::{build_file_name, sanitize_number},
};

use std::{
    panic::Location,
    path::PathBuf,
    time::Duration,
};

use chrono::Local;
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Precondition gate for recording attempts.
///
/// The controller never touches the capture layer unless the gate says
/// recording is allowed; acquiring the underlying permissions is the
/// host's problem.
pub trait PermissionGate {
    /// Whether a capture may be attempted right now.
    fn recording_allowed(&self) -> bool;
}

/// A gate for hosts where permissions are granted by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn recording_allowed(&self) -> bool {
        true
    }
}

/// Owns the recording session lifecycle.
///
/// Consumes one [`ClassifiedCallEvent`] at a time, strictly serially —
/// the at-most-one-active-session invariant depends on it. The
/// controller itself is not thread-safe; hosts whose telephony layer
/// calls back from multiple threads must wrap it in a single mutex
/// around start/stop. Call rates are low enough that one lock is all
/// the coordination needed.
///
/// The phone number can arrive in a separate callback than the state
/// transition, in either order; [`set_phone_number`] absorbs those
/// out-of-band updates.
///
/// [`set_phone_number`]: CallRecordingController::set_phone_number
pub struct CallRecordingController<B, P> {
    backend: B,
    permissions: P,
    recordings_dir: PathBuf,
    profile: EncodingProfile,
    start_delay: Duration,
    session: RecordingSession,
    active: Option<Box<dyn CaptureSession>>,
    phone_number: Option<String>,
    direction: CallDirection,
}

impl<B: CaptureBackend, P: PermissionGate> CallRecordingController<B, P> {
    /// Create a controller writing recordings under `recordings_dir`.
    ///
    /// `start_delay` is the policy pause between answer detection and
    /// capture start, applied by the event loop (nominal 0–2000 ms; it
    /// lets the call audio path stabilize before the recorder attaches).
    pub fn new(
        backend: B,
        permissions: P,
        recordings_dir: impl Into<PathBuf>,
        profile: EncodingProfile,
        start_delay: Duration,
    ) -> Self {
        Self {
            backend,
            permissions,
            recordings_dir: recordings_dir.into(),
            profile,
            start_delay,
            session: RecordingSession::idle(),
            active: None,
            phone_number: None,
            direction: CallDirection::Unknown,
        }
    }

    /// The configured answer-to-start delay.
    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// Current session status.
    pub fn status(&self) -> RecordingStatus {
        self.session.status
    }

    /// The current session record.
    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Record an out-of-band phone number update.
    ///
    /// Empty updates are ignored; the host sometimes re-delivers the
    /// state change with no number attached.
    pub fn set_phone_number(&mut self, number: Option<&str>) {
        if let Some(n) = number
            && !n.is_empty()
        {
            self.phone_number = Some(n.to_string());
        }
    }

    /// Apply one classified call event to the session.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` when the gate refuses, `AllSourcesExhausted`
    /// when no capture source initializes. Both leave the controller
    /// consistent; a later call may succeed independently.
    #[track_caller]
    #[instrument(skip(self), fields(status = ?self.session.status))]
    pub fn handle_event(&mut self, event: ClassifiedCallEvent) -> crate::CoreResult<()> {
        match event.kind {
            CallEventKind::Ringing => {
                self.direction = event.direction;
                debug!(number = self.phone_number.as_deref().unwrap_or("unknown"), "Ringing");
                Ok(())
            }
            CallEventKind::Answered => self.start(event.direction),
            CallEventKind::Ended => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Stop any active capture; used at `Ended` and at host teardown.
    ///
    /// A failing platform stop is logged and swallowed — the call has
    /// ended regardless — but the capture resource is always released.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if let Some(mut session) = self.active.take() {
            if let Err(e) = session.stop() {
                warn!(error = %e, "Capture stop failed, releasing anyway");
            }
            session.release();

            info!(path = ?self.session.output_path, "Recording stopped");
            self.session = RecordingSession::idle();
        }

        self.phone_number = None;
        self.direction = CallDirection::Unknown;
    }

    #[track_caller]
    fn start(&mut self, direction: CallDirection) -> crate::CoreResult<()> {
        if self.session.status == RecordingStatus::Recording {
            debug!("Already recording, ignoring start");
            return Ok(());
        }

        if !self.permissions.recording_allowed() {
            return Err(RecordError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.direction = direction;

        let number = sanitize_number(self.phone_number.as_deref());
        let started_at = Local::now().naive_local();
        let file_name = build_file_name(direction, &number, started_at);
        let output = self.recordings_dir.join(file_name);

        match capture::try_start(&self.backend, &self.profile, &output, &SOURCE_PRIORITY) {
            Ok(active) => {
                info!(
                    source = %active.source,
                    path = ?output,
                    %direction,
                    "Recording started"
                );
                self.session = RecordingSession {
                    status: RecordingStatus::Recording,
                    output_path: Some(output),
                    chosen_source: Some(active.source),
                    started_at: Some(started_at),
                };
                self.active = Some(active.session);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to start recording");
                self.session = RecordingSession {
                    status: RecordingStatus::Failed,
                    output_path: None,
                    chosen_source: None,
                    started_at: None,
                };
                Err(e)
            }
        }
    }
}
