use crate::capture::CaptureSource;

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Status of the one capture session the controller owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    /// No capture in progress.
    Idle,
    /// Audio is being captured.
    Recording,
    /// The last start attempt exhausted every capture source.
    ///
    /// Cleared by the next successful start; not retried within the
    /// same call.
    Failed,
}

/// One active or completed capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    /// Current status.
    pub status: RecordingStatus,
    /// Destination file of the active capture.
    pub output_path: Option<PathBuf>,
    /// The capture source that won the probe.
    pub chosen_source: Option<CaptureSource>,
    /// Wall-clock start of the capture.
    pub started_at: Option<NaiveDateTime>,
}

impl RecordingSession {
    pub(crate) fn idle() -> Self {
        Self {
            status: RecordingStatus::Idle,
            output_path: None,
            chosen_source: None,
            started_at: None,
        }
    }
}
