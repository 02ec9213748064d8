//! Shared test doubles for the capture trait seams.

use crate::{
    CaptureBackend, CaptureSession, CaptureSource, CoreResult, EncodingProfile, RecordError,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;

/// Everything the fake backend observed, for assertions.
#[derive(Debug, Default)]
pub struct BackendLog {
    pub opened: Vec<CaptureSource>,
    pub started: Vec<CaptureSource>,
    pub stopped: usize,
    pub released: usize,
    pub open_handles: usize,
    pub outputs: Vec<PathBuf>,
}

/// Scriptable [`CaptureBackend`] double.
pub struct FakeBackend {
    log: Arc<Mutex<BackendLog>>,
    fail_open: Vec<CaptureSource>,
    fail_start: Vec<CaptureSource>,
    fail_all: Arc<Mutex<bool>>,
    fail_stop: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(BackendLog::default())),
            fail_open: Vec::new(),
            fail_start: Vec::new(),
            fail_all: Arc::new(Mutex::new(false)),
            fail_stop: false,
        }
    }

    /// Refuse to open the given source.
    pub fn fail_open(mut self, source: CaptureSource) -> Self {
        self.fail_open.push(source);
        self
    }

    /// Open the given source but fail its `start`.
    pub fn fail_start(mut self, source: CaptureSource) -> Self {
        self.fail_start.push(source);
        self
    }

    /// Make `stop` fail on every session.
    pub fn fail_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Handle to the shared observation log.
    pub fn log(&self) -> Arc<Mutex<BackendLog>> {
        Arc::clone(&self.log)
    }

    /// Toggle for refusing every open, flippable mid-test.
    pub fn fail_all_handle(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.fail_all)
    }

    fn unavailable(source: CaptureSource, reason: &str) -> RecordError {
        RecordError::SourceUnavailable {
            source,
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl CaptureBackend for FakeBackend {
    fn open(
        &self,
        source: CaptureSource,
        _profile: &EncodingProfile,
        output: &Path,
    ) -> CoreResult<Box<dyn CaptureSession>> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.opened.push(source);

        if *self.fail_all.lock().unwrap_or_else(|e| e.into_inner())
            || self.fail_open.contains(&source)
        {
            return Err(Self::unavailable(source, "scripted open failure"));
        }

        log.open_handles += 1;
        log.outputs.push(output.to_path_buf());

        Ok(Box::new(FakeSession {
            source,
            log: Arc::clone(&self.log),
            fail_start: self.fail_start.contains(&source),
            fail_stop: self.fail_stop,
            released: false,
        }))
    }
}

pub struct FakeSession {
    source: CaptureSource,
    log: Arc<Mutex<BackendLog>>,
    fail_start: bool,
    fail_stop: bool,
    released: bool,
}

impl CaptureSession for FakeSession {
    fn start(&mut self) -> CoreResult<()> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.started.push(self.source);

        if self.fail_start {
            return Err(FakeBackend::unavailable(
                self.source,
                "scripted start failure",
            ));
        }
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.stopped += 1;

        if self.fail_stop {
            return Err(RecordError::StopFailed {
                reason: "scripted stop failure".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.released += 1;
        log.open_handles -= 1;
    }
}
