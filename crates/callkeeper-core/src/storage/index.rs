//! Rebuilds the display-ready recording list from the files on disk.
//!
//! The directory is the source of truth: each scan re-derives every
//! record from filenames alone, cross-referencing the host call log for
//! what the name does not encode. No cached index, no invalidation.

use crate::{
    CoreResult,
    call::CallDirection,
    storage::naming::parse_file_name,
};

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

/// Time window around a recording's start used to match call-log entries.
pub const CALL_LOG_WINDOW: Duration = Duration::from_secs(10);

/// A persisted, parsed recording entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCallRecord {
    /// The filename on disk.
    pub file_name: String,
    /// Sanitized phone number recovered from the name.
    pub phone_number: String,
    /// Call direction, from the name or the call log.
    pub direction: CallDirection,
    /// Call duration in milliseconds; zero when the call log had no match.
    pub duration_millis: u64,
    /// When the capture started.
    pub start_time: NaiveDateTime,
    /// Start time plus duration.
    pub end_time: NaiveDateTime,
    /// Full path to the recording file.
    pub file_path: PathBuf,
}

/// A matching entry from the host call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLogEntry {
    /// Direction the host recorded for the call.
    pub direction: CallDirection,
    /// Call duration in milliseconds.
    pub duration_millis: u64,
}

/// Point query into the host call log.
///
/// Best-effort by contract: absence of a match is expected and the index
/// falls back to documented defaults rather than failing.
pub trait CallLogLookup {
    /// Find the call-log entry for `number` within `window` of `around`.
    fn find(&self, number: &str, around: NaiveDateTime, window: Duration) -> Option<CallLogEntry>;
}

/// A lookup for hosts without a call log; never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallLog;

impl CallLogLookup for NoCallLog {
    fn find(&self, _: &str, _: NaiveDateTime, _: Duration) -> Option<CallLogEntry> {
        None
    }
}

/// Scans the recording directory into ordered [`RecordedCallRecord`]s.
#[derive(Debug, Clone)]
pub struct RecordingIndex<L> {
    directory: PathBuf,
    call_log: L,
}

impl<L: CallLogLookup> RecordingIndex<L> {
    /// Create an index over `directory`, resolving gaps through `call_log`.
    pub fn new(directory: impl Into<PathBuf>, call_log: L) -> Self {
        Self {
            directory: directory.into(),
            call_log,
        }
    }

    /// The directory this index scans.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Produce a fresh snapshot of all recordings, newest first.
    ///
    /// Files that match neither naming scheme are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be listed.
    #[track_caller]
    #[instrument(skip(self), fields(directory = ?self.directory))]
    pub fn scan(&self) -> CoreResult<Vec<RecordedCallRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let Some(parsed) = parse_file_name(name) else {
                debug!(file = name, "Skipping file outside naming scheme");
                continue;
            };

            let log_entry = self
                .call_log
                .find(&parsed.number, parsed.timestamp, CALL_LOG_WINDOW);

            // Explicit direction tag wins; otherwise the call log, then
            // the documented fallback (Outgoing, zero duration).
            let direction = parsed
                .direction
                .or(log_entry.map(|e| e.direction))
                .unwrap_or(CallDirection::Outgoing);
            let duration_millis = log_entry.map(|e| e.duration_millis).unwrap_or(0);

            let end_time = parsed.timestamp
                + chrono::Duration::milliseconds(duration_millis.min(i64::MAX as u64) as i64);

            records.push(RecordedCallRecord {
                file_name: name.to_string(),
                phone_number: parsed.number,
                direction,
                duration_millis,
                start_time: parsed.timestamp,
                end_time,
                file_path: path,
            });
        }

        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        info!(count = records.len(), "Recording scan complete");

        Ok(records)
    }
}
