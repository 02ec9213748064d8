mod backend;
mod probe;

pub use {
    backend::{
        CAPTURE_PROFILE, CaptureBackend, CaptureSession, CaptureSource, EncodingProfile,
        MAX_CAPTURE_SECS, SOURCE_PRIORITY,
    },
    probe::{ActiveCapture, try_start},
};
