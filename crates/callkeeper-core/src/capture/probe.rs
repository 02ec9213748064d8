//! Ordered capture-source probing.
//!
//! Recording a phone call is best-effort on every host: the privileged
//! call-tapped sources are blocked on many devices, so each candidate is
//! tried in turn and the failure only surfaces once the list is
//! exhausted. Fallback is expressed as result values, not caught errors.

use crate::{
    RecordError,
    capture::{CaptureBackend, CaptureSession, CaptureSource, EncodingProfile},
};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// A capture session that made it through prepare and start.
pub struct ActiveCapture {
    /// The candidate that won.
    pub source: CaptureSource,
    /// The live session handle.
    pub session: Box<dyn CaptureSession>,
}

/// Attempt each candidate strictly in order; first prepare+start success
/// wins.
///
/// Every failed attempt is released before the next candidate is tried,
/// so on [`RecordError::AllSourcesExhausted`] the caller holds no
/// partially opened session.
#[track_caller]
#[instrument(skip_all, fields(output = ?output))]
pub fn try_start(
    backend: &dyn CaptureBackend,
    profile: &EncodingProfile,
    output: &Path,
    candidates: &[CaptureSource],
) -> Result<ActiveCapture, RecordError> {
    for &source in candidates {
        let mut session = match backend.open(source, profile, output) {
            Ok(s) => s,
            Err(e) => {
                debug!(%source, error = %e, "Capture source failed to open");
                continue;
            }
        };

        match session.start() {
            Ok(()) => {
                info!(%source, "Capture started");
                return Ok(ActiveCapture { source, session });
            }
            Err(e) => {
                warn!(%source, error = %e, "Capture source failed to start");
                session.release();
            }
        }
    }

    Err(RecordError::AllSourcesExhausted {
        attempted: candidates.len(),
        location: ErrorLocation::from(Location::caller()),
    })
}
