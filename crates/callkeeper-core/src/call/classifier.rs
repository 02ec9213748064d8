//! Turns raw telephony state transitions into directional call events.
//!
//! Direction is only trustworthy for two transitions: `Idle -> Offhook`
//! is an outgoing call being dialed, `Ringing -> Offhook` is an incoming
//! call being answered. Anything else reaching `Offhook` (call waiting,
//! conference joins) gets `Unknown` rather than a stale flag.

use crate::call::{CallDirection, CallEventKind, ClassifiedCallEvent, RawCallState};

use tracing::debug;

/// Classify a single raw-state transition.
///
/// Pure function over the transition plus the last direction the caller
/// tracked; `last_direction` is only consulted for `Ended` events so the
/// recording that just finished keeps the direction it started with.
pub fn classify(
    previous: RawCallState,
    new: RawCallState,
    last_direction: CallDirection,
) -> ClassifiedCallEvent {
    match new {
        RawCallState::Ringing => ClassifiedCallEvent {
            kind: CallEventKind::Ringing,
            direction: CallDirection::Incoming,
        },
        RawCallState::Offhook => {
            let direction = match previous {
                RawCallState::Idle => CallDirection::Outgoing,
                RawCallState::Ringing => CallDirection::Incoming,
                RawCallState::Offhook => CallDirection::Unknown,
            };
            ClassifiedCallEvent {
                kind: CallEventKind::Answered,
                direction,
            }
        }
        RawCallState::Idle => ClassifiedCallEvent {
            kind: CallEventKind::Ended,
            direction: last_direction,
        },
    }
}

/// Retains the transition history [`classify`] needs across callbacks.
///
/// One tracker per call-state source; feed it every raw notification in
/// delivery order.
#[derive(Debug)]
pub struct CallStateTracker {
    previous: RawCallState,
    direction: CallDirection,
}

impl CallStateTracker {
    /// Create a tracker assuming the line starts idle.
    pub fn new() -> Self {
        Self {
            previous: RawCallState::Idle,
            direction: CallDirection::Unknown,
        }
    }

    /// Observe a raw state notification and classify it.
    ///
    /// Updates the tracked direction on `Ringing`/`Answered` and resets
    /// it to `Unknown` once the call has ended.
    pub fn observe(&mut self, new: RawCallState) -> ClassifiedCallEvent {
        let event = classify(self.previous, new, self.direction);

        debug!(
            previous = %self.previous,
            new = %new,
            direction = %event.direction,
            "Call state transition"
        );

        self.direction = match event.kind {
            CallEventKind::Ringing | CallEventKind::Answered => event.direction,
            CallEventKind::Ended => CallDirection::Unknown,
        };
        self.previous = new;

        event
    }

    /// The direction of the call currently being tracked.
    pub fn direction(&self) -> CallDirection {
        self.direction
    }
}

impl Default for CallStateTracker {
    fn default() -> Self {
        Self::new()
    }
}
