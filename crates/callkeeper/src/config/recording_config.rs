use crate::config::{default_max_duration_secs, default_start_delay_ms};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recording policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Directory recordings are written to (None = project data dir).
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Delay between answer detection and capture start, in milliseconds.
    ///
    /// Lets the call audio path stabilize before the recorder attaches.
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    /// Safety cap on a single capture, enforced by the capture layer.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            start_delay_ms: default_start_delay_ms(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}
