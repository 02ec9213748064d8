//! Filename codec for persisted recordings.
//!
//! The filename is the only metadata store: direction, number, and start
//! time are all recovered by parsing the name back. Two schemes exist on
//! disk — the current one with an explicit direction code and a legacy
//! one without — and both must parse.
//!
//! Current: `VOICE_<OUT|IN>_<number>_<YYYYMMDD_HHMMSS>.m4a`
//! Legacy:  `CALL_<number>_<YYYYMMDD_HHMMSS>.m4a`

use crate::call::CallDirection;

use chrono::NaiveDateTime;

/// Prefix tag of the current naming scheme.
pub const CURRENT_TAG: &str = "VOICE";

/// Prefix tag of the legacy naming scheme (direction not encoded).
pub const LEGACY_TAG: &str = "CALL";

/// File extension shared by both schemes.
pub const RECORDING_EXT: &str = "m4a";

/// Timestamp format embedded in filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Normalize a raw phone number into a filesystem-safe token.
///
/// Keeps digits and `+`, drops everything else; an absent or emptied
/// number becomes the literal `"unknown"`. Total, never fails.
pub fn sanitize_number(raw: Option<&str>) -> String {
    let cleaned: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

fn direction_code(direction: CallDirection) -> &'static str {
    match direction {
        CallDirection::Incoming => "IN",
        // Unknown falls back to OUT, the same fallback the index applies
        // on a call-log miss.
        CallDirection::Outgoing | CallDirection::Unknown => "OUT",
    }
}

/// Build a current-scheme filename for a recording.
///
/// `number` must already be sanitized. Reversible: [`parse_file_name`]
/// recovers direction, number, and timestamp exactly.
pub fn build_file_name(
    direction: CallDirection,
    number: &str,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "{CURRENT_TAG}_{}_{}_{}.{RECORDING_EXT}",
        direction_code(direction),
        number,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Structured fields recovered from a recording filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecordingName {
    /// Direction code, when the scheme encodes one.
    pub direction: Option<CallDirection>,
    /// The sanitized phone number.
    pub number: String,
    /// Capture start time.
    pub timestamp: NaiveDateTime,
}

/// Parse a filename under either naming scheme.
///
/// Returns `None` for anything that is not a recording of ours; the
/// index treats such files as foreign, never as errors.
pub fn parse_file_name(name: &str) -> Option<ParsedRecordingName> {
    let stem = name.strip_suffix(&format!(".{RECORDING_EXT}"))?;
    let parts: Vec<&str> = stem.split('_').collect();

    // Trailing two parts are always the timestamp halves.
    let (fields, direction) = match parts.as_slice() {
        [tag, code, number, date, time] if *tag == CURRENT_TAG => {
            let direction = match *code {
                "OUT" => CallDirection::Outgoing,
                "IN" => CallDirection::Incoming,
                _ => return None,
            };
            ((*number, *date, *time), Some(direction))
        }
        [tag, number, date, time] if *tag == LEGACY_TAG => ((*number, *date, *time), None),
        _ => return None,
    };

    let (number, date, time) = fields;
    if number.is_empty() {
        return None;
    }

    let timestamp =
        NaiveDateTime::parse_from_str(&format!("{date}_{time}"), TIMESTAMP_FORMAT).ok()?;

    Some(ParsedRecordingName {
        direction,
        number: number.to_string(),
        timestamp,
    })
}
