mod controller;
mod session;

pub use {
    controller::{AlwaysGranted, CallRecordingController, PermissionGate},
    session::{RecordingSession, RecordingStatus},
};
