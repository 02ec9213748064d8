//! Trait seams for the host audio-capture layer.

use crate::CoreResult;

use std::{fmt, path::Path};

/// One of the host's audio input configurations, in recording terms.
///
/// Which of these actually works depends on the device and OS policy;
/// the probe walks [`SOURCE_PRIORITY`] until one initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// Audio tapped directly from the voice-call path (both parties).
    VoiceCall,
    /// The communication-optimized input path (uplink-biased).
    VoiceCommunication,
    /// The plain microphone; always present, records only what it hears.
    Microphone,
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::VoiceCall => write!(f, "voice_call"),
            CaptureSource::VoiceCommunication => write!(f, "voice_communication"),
            CaptureSource::Microphone => write!(f, "microphone"),
        }
    }
}

impl std::error::Error for CaptureSource {}

/// Fixed capture-source priority: call-tapped paths first, the plain
/// microphone as the last resort. Not user-configurable.
pub const SOURCE_PRIORITY: [CaptureSource; 3] = [
    CaptureSource::VoiceCall,
    CaptureSource::VoiceCommunication,
    CaptureSource::Microphone,
];

/// Safety cap on a single capture, enforced by the capture layer itself.
pub const MAX_CAPTURE_SECS: u64 = 60 * 60;

/// The fixed encoding profile applied to every recording.
///
/// System-wide constants, not per-call settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingProfile {
    /// Container format name.
    pub container: &'static str,
    /// Audio codec name.
    pub codec: &'static str,
    /// Encoding bit rate in bits per second.
    pub bit_rate: u32,
    /// Sampling rate in Hz.
    pub sample_rate: u32,
    /// File extension used by the naming scheme.
    pub extension: &'static str,
}

/// The profile every session records with: MPEG-4/AAC at 128 kbit/s, 44.1 kHz.
pub const CAPTURE_PROFILE: EncodingProfile = EncodingProfile {
    container: "mpeg4",
    codec: "aac",
    bit_rate: 128_000,
    sample_rate: 44_100,
    extension: "m4a",
};

/// An opened, prepared capture session.
///
/// Returned by [`CaptureBackend::open`] ready to start. Exactly one of
/// these may be live at a time; the recording controller owns it.
pub trait CaptureSession: Send {
    /// Begin writing audio to the output path.
    fn start(&mut self) -> CoreResult<()>;

    /// Stop capturing and finalize the output file.
    fn stop(&mut self) -> CoreResult<()>;

    /// Release all underlying resources.
    ///
    /// Must be infallible and idempotent; called after `stop` whether or
    /// not `stop` succeeded, and on sessions whose `start` failed. A
    /// session that never started cleans up its partial output.
    fn release(&mut self);
}

/// Factory for capture sessions, implemented per host platform.
pub trait CaptureBackend {
    /// Open and prepare a recorder for one source candidate.
    ///
    /// Configures the fixed [`EncodingProfile`] and the output path.
    /// Returns [`crate::RecordError::SourceUnavailable`] when this
    /// candidate cannot initialize on the host.
    fn open(
        &self,
        source: CaptureSource,
        profile: &EncodingProfile,
        output: &Path,
    ) -> CoreResult<Box<dyn CaptureSession>>;
}
