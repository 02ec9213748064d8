mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, recording_config::RecordingConfig,
};

pub(crate) const DEFAULT_START_DELAY_MS: u64 = 2000;
pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = 60 * 60;

pub(crate) fn default_start_delay_ms() -> u64 {
    DEFAULT_START_DELAY_MS
}

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}
