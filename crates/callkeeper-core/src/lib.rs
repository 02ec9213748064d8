//! Callkeeper Core Library
//!
//! Platform-independent call-recording logic: classifies raw telephony
//! state transitions into directional call events, drives the
//! start/stop policy over an ordered set of capture-source candidates,
//! and rebuilds the recording list from the filename convention on
//! disk. The host telephony stack, audio capture layer, permission
//! state, and call log are all consumed through narrow trait seams.
//!
//! # Example
//!
//! ```no_run
//! use callkeeper_core::{
//!     AlwaysGranted, CAPTURE_PROFILE, CallRecordingController, CallStateTracker,
//!     CaptureBackend, CoreResult, RawCallState,
//! };
//!
//! use std::time::Duration;
//!
//! fn monitor<B: CaptureBackend>(backend: B) -> CoreResult<()> {
//!     let mut tracker = CallStateTracker::new();
//!     let mut controller = CallRecordingController::new(
//!         backend,
//!         AlwaysGranted,
//!         "/var/lib/callkeeper/recordings",
//!         CAPTURE_PROFILE,
//!         Duration::from_millis(2000),
//!     );
//!
//!     controller.set_phone_number(Some("+15550100"));
//!     for state in [RawCallState::Ringing, RawCallState::Offhook, RawCallState::Idle] {
//!         controller.handle_event(tracker.observe(state))?;
//!     }
//!     Ok(())
//! }
//! ```

mod call;
mod capture;
mod error;
mod recording;
mod storage;

pub use {
    call::{
        CallDirection, CallEventKind, CallStateEvent, CallStateTracker, ClassifiedCallEvent,
        RawCallState, classify,
    },
    capture::{
        ActiveCapture, CAPTURE_PROFILE, CaptureBackend, CaptureSession, CaptureSource,
        EncodingProfile, MAX_CAPTURE_SECS, SOURCE_PRIORITY, try_start,
    },
    error::{RecordError, Result as CoreResult},
    recording::{
        AlwaysGranted, CallRecordingController, PermissionGate, RecordingSession, RecordingStatus,
    },
    storage::{
        CALL_LOG_WINDOW, CURRENT_TAG, CallLogEntry, CallLogLookup, LEGACY_TAG, NoCallLog,
        ParsedRecordingName, RECORDING_EXT, RecordedCallRecord, RecordingIndex, TIMESTAMP_FORMAT,
        build_file_name, parse_file_name, sanitize_number,
    },
};

#[cfg(test)]
mod tests;
