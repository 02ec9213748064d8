use std::fmt;

/// Call status as reported by the host telephony layer.
///
/// The three-valued state machine every telephony stack exposes:
/// no call, an unanswered incoming call, or an active line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCallState {
    /// No call in progress.
    Idle,
    /// An incoming call is ringing.
    Ringing,
    /// A call is active (dialing, connecting, or connected).
    Offhook,
}

impl fmt::Display for RawCallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCallState::Idle => write!(f, "IDLE"),
            RawCallState::Ringing => write!(f, "RINGING"),
            RawCallState::Offhook => write!(f, "OFFHOOK"),
        }
    }
}

/// Direction of the call a recording belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    /// Call was received on this device.
    Incoming,
    /// Call was placed from this device.
    Outgoing,
    /// Direction could not be determined from the observed transitions.
    Unknown,
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallDirection::Incoming => write!(f, "Incoming"),
            CallDirection::Outgoing => write!(f, "Outgoing"),
            CallDirection::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A raw state notification as delivered by the host.
///
/// The associated number is optional: some host callback shapes deliver
/// it with the state change, others through a separate update with no
/// ordering guarantee between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStateEvent {
    /// The new raw call state.
    pub state: RawCallState,
    /// Phone number associated with the call, when the host knows it.
    pub number: Option<String>,
}

/// Lifecycle meaning of a raw-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEventKind {
    /// An incoming call started ringing.
    Ringing,
    /// A call went active; the direction field says which way.
    Answered,
    /// The call ended.
    Ended,
}

/// A semantically interpreted call-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedCallEvent {
    /// What happened to the call.
    pub kind: CallEventKind,
    /// Which way the call goes, as far as the transitions reveal.
    pub direction: CallDirection,
}
