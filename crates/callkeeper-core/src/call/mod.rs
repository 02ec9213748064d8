mod classifier;
mod state;

pub use {
    classifier::{CallStateTracker, classify},
    state::{CallDirection, CallEventKind, CallStateEvent, ClassifiedCallEvent, RawCallState},
};
