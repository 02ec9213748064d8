//! The telephony bridge feed.
//!
//! The host call-state source is external to this process; platform
//! adapters (or a developer at a terminal) push raw notifications in
//! over stdin as a line protocol, one event per line:
//!
//! ```text
//! RINGING [number]   incoming call ringing
//! OFFHOOK [number]   line went active
//! IDLE               call ended / no call
//! NUMBER <number>    out-of-band phone number update
//! ```
//!
//! State lines and number updates carry no ordering guarantee relative
//! to each other — some host callback shapes deliver the number with
//! the state change, others separately. Both collapse into
//! [`TelephonyEvent`], the single narrow contract the event loop
//! consumes.
//!
//! The feed is registered exactly once at startup and owned by `main`;
//! dropping the receiving side of the channel ends the forwarder.

use std::io::BufRead;

use callkeeper_core::{CallStateEvent, RawCallState};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// One notification from the telephony bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelephonyEvent {
    /// The raw call state changed, possibly with an associated number.
    StateChanged(CallStateEvent),
    /// The phone number arrived separately from the state change.
    NumberUpdated(String),
}

/// Parse one feed line; `None` for lines outside the protocol.
pub fn parse_feed_line(line: &str) -> Option<TelephonyEvent> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    let argument = tokens.next().map(str::to_string);

    let state = match keyword {
        "IDLE" => RawCallState::Idle,
        "RINGING" => RawCallState::Ringing,
        "OFFHOOK" => RawCallState::Offhook,
        "NUMBER" => return argument.map(TelephonyEvent::NumberUpdated),
        _ => return None,
    };

    Some(TelephonyEvent::StateChanged(CallStateEvent {
        state,
        number: argument,
    }))
}

/// Forward stdin feed lines into the event channel.
///
/// Single persistent blocking task; stdin reads have no async form and
/// this keeps the event loop free. Shutdown: when the receiver is
/// dropped, the next `blocking_send` fails and the loop breaks.
pub fn spawn_stdin_feed(event_tx: mpsc::Sender<TelephonyEvent>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };

            match parse_feed_line(&line) {
                Some(event) => {
                    debug!(?event, "Feed event");
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!(line = line.as_str(), "Unrecognized feed line, ignoring"),
            }
        }
    })
}
