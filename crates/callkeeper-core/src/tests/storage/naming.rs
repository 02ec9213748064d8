use crate::{
    CallDirection, ParsedRecordingName, build_file_name, parse_file_name, sanitize_number,
};

use chrono::NaiveDate;

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .unwrap_or_default()
}

/// WHAT: Sanitizer keeps only digits and plus
/// WHY: The number becomes a filename token and must stay filesystem-safe
#[test]
fn given_formatted_number_when_sanitized_then_only_digits_and_plus_remain() {
    assert_eq!(sanitize_number(Some("+1-555-0100")), "+15550100");
    assert_eq!(sanitize_number(Some("+1 (555) 0199 ext. 2")), "+155501992");
    assert_eq!(sanitize_number(Some("15550100")), "15550100");
}

/// WHAT: Absent or emptied numbers become the literal "unknown"
/// WHY: The sanitizer is total; every input must yield a usable token
#[test]
fn given_absent_or_letter_only_input_when_sanitized_then_unknown() {
    assert_eq!(sanitize_number(None), "unknown");
    assert_eq!(sanitize_number(Some("")), "unknown");
    assert_eq!(sanitize_number(Some("blocked caller")), "unknown");
}

/// WHAT: Sanitizer output alphabet is always [0-9+] or exactly "unknown"
/// WHY: The guarantee holds over all inputs, not just the handpicked ones
#[test]
fn given_assorted_inputs_when_sanitized_then_output_alphabet_holds() {
    let inputs = [
        "+49 (0) 30/1234-5678",
        "sip:alice@example.com",
        "_../..%00",
        "☎ +81 3 1234 5678",
        "N/A",
    ];

    for input in inputs {
        let out = sanitize_number(Some(input));
        assert!(
            out == "unknown" || out.chars().all(|c| c.is_ascii_digit() || c == '+'),
            "input {input:?} gave {out:?}"
        );
    }
}

/// WHAT: Current-scheme filenames round-trip through the parser exactly
/// WHY: The filename is the only metadata store for a recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_built_file_name_when_parsed_then_fields_recovered_exactly() {
    let timestamp = ts(2024, 1, 1, 12, 0, 0);

    for direction in [CallDirection::Outgoing, CallDirection::Incoming] {
        let name = build_file_name(direction, "+15550100", timestamp);
        let parsed = parse_file_name(&name).unwrap();

        assert_eq!(
            parsed,
            ParsedRecordingName {
                direction: Some(direction),
                number: "+15550100".to_string(),
                timestamp,
            }
        );
    }
}

/// WHAT: The current scheme encodes OUT/IN tags in a fixed layout
/// WHY: On-disk layout is a compatibility contract with existing installs
#[test]
fn given_known_fields_when_built_then_exact_expected_name() {
    let name = build_file_name(CallDirection::Outgoing, "+15550100", ts(2024, 1, 1, 12, 0, 0));
    assert_eq!(name, "VOICE_OUT_+15550100_20240101_120000.m4a");

    let name = build_file_name(CallDirection::Incoming, "15550199", ts(2023, 12, 31, 23, 59, 59));
    assert_eq!(name, "VOICE_IN_15550199_20231231_235959.m4a");
}

/// WHAT: Unknown direction is written with the OUT fallback code
/// WHY: The scheme has two codes; Unknown maps to the documented fallback
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_direction_when_built_then_out_code_used() {
    let name = build_file_name(CallDirection::Unknown, "15550100", ts(2024, 6, 1, 8, 30, 0));

    assert!(name.starts_with("VOICE_OUT_"));
    assert_eq!(
        parse_file_name(&name).unwrap().direction,
        Some(CallDirection::Outgoing)
    );
}

/// WHAT: Legacy-scheme names parse with direction undetermined
/// WHY: Recordings made before the direction tag existed must stay listed
#[test]
#[allow(clippy::unwrap_used)]
fn given_legacy_name_when_parsed_then_number_and_time_without_direction() {
    let parsed = parse_file_name("CALL_15550100_20240101_120000.m4a").unwrap();

    assert_eq!(parsed.direction, None);
    assert_eq!(parsed.number, "15550100");
    assert_eq!(parsed.timestamp, ts(2024, 1, 1, 12, 0, 0));
}

/// WHAT: Names outside both schemes are rejected, not guessed at
/// WHY: The index skips foreign files; a lenient parser would invent records
#[test]
fn given_foreign_or_malformed_names_when_parsed_then_none() {
    let rejected = [
        "garbage.txt",
        "VOICE_OUT_15550100_20240101.m4a",
        "VOICE_XX_15550100_20240101_120000.m4a",
        "VOICE_OUT_15550100_20241301_120000.m4a",
        "MEMO_15550100_20240101_120000.m4a",
        "CALL_15550100_20240101_120000.wav",
        "CALL__20240101_120000.m4a",
        "VOICE_OUT_15550100_20240101_120000.m4a.bak",
    ];

    for name in rejected {
        assert!(parse_file_name(name).is_none(), "accepted {name:?}");
    }
}
