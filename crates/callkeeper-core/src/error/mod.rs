use crate::capture::CaptureSource;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording subsystem errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Recording permissions are not granted; no capture was attempted.
    #[error("Recording permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A single capture-source candidate failed to prepare or start.
    ///
    /// Absorbed by the probe, which moves on to the next candidate;
    /// only surfaced directly by a backend.
    #[error("Capture source {source} unavailable: {reason} {location}")]
    SourceUnavailable {
        /// The candidate that failed.
        source: CaptureSource,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Every capture-source candidate failed; terminal for this call.
    #[error("All {attempted} capture sources exhausted {location}")]
    AllSourcesExhausted {
        /// Number of candidates attempted.
        attempted: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stopping an active capture failed.
    ///
    /// Recovered locally: the resource is still released and the
    /// session transitions to idle since the call has ended regardless.
    #[error("Failed to stop capture: {reason} {location}")]
    StopFailed {
        /// Description of the stop failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecordError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecordError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecordError`].
pub type Result<T> = std::result::Result<T, RecordError>;
