use serde::{Deserialize, Serialize};

/// Audio capture configuration for the desktop backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Input device name for microphone capture (None = default device).
    #[serde(default)]
    pub input_device: Option<String>,
}
