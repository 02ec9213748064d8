use crate::{
    CAPTURE_PROFILE, CaptureSource, RecordError, SOURCE_PRIORITY,
    tests::support::FakeBackend, try_start,
};

use std::path::Path;

/// WHAT: Exhausting all candidates returns AllSourcesExhausted with zero open handles
/// WHY: A failed probe must never leak a partially opened capture session
#[test]
#[allow(clippy::unwrap_used)]
fn given_all_sources_failing_when_probing_then_exhausted_and_no_open_handles() {
    // Given: a backend refusing every candidate
    let backend = FakeBackend::new()
        .fail_open(CaptureSource::VoiceCall)
        .fail_open(CaptureSource::VoiceCommunication)
        .fail_open(CaptureSource::Microphone);
    let log = backend.log();

    // When: probing the full priority list
    let result = try_start(
        &backend,
        &CAPTURE_PROFILE,
        Path::new("/tmp/out.m4a"),
        &SOURCE_PRIORITY,
    );

    // Then: terminal failure, every candidate attempted, nothing left open
    assert!(matches!(
        result,
        Err(RecordError::AllSourcesExhausted { attempted: 3, .. })
    ));
    let log = log.lock().unwrap();
    assert_eq!(log.opened.len(), 3);
    assert_eq!(log.open_handles, 0);
}

/// WHAT: First candidate that prepares and starts wins
/// WHY: The priority order is a fixed policy, not a preference
#[test]
#[allow(clippy::unwrap_used)]
fn given_working_first_candidate_when_probing_then_it_is_chosen_without_fallback() {
    let backend = FakeBackend::new();
    let log = backend.log();

    let active = try_start(
        &backend,
        &CAPTURE_PROFILE,
        Path::new("/tmp/out.m4a"),
        &SOURCE_PRIORITY,
    )
    .unwrap();

    assert_eq!(active.source, CaptureSource::VoiceCall);
    let log = log.lock().unwrap();
    assert_eq!(log.opened, vec![CaptureSource::VoiceCall]);
    assert_eq!(log.open_handles, 1);
}

/// WHAT: Failed attempts are released before the next candidate is tried
/// WHY: Per-candidate failures recover locally and must not accumulate resources
#[test]
#[allow(clippy::unwrap_used)]
fn given_early_candidates_failing_when_probing_then_fallback_wins_and_failures_released() {
    // Given: first candidate refuses to open, second opens but fails to start
    let backend = FakeBackend::new()
        .fail_open(CaptureSource::VoiceCall)
        .fail_start(CaptureSource::VoiceCommunication);
    let log = backend.log();

    // When: probing in priority order
    let active = try_start(
        &backend,
        &CAPTURE_PROFILE,
        Path::new("/tmp/out.m4a"),
        &SOURCE_PRIORITY,
    )
    .unwrap();

    // Then: the microphone fallback wins and the start-failed session was released
    assert_eq!(active.source, CaptureSource::Microphone);
    let log = log.lock().unwrap();
    assert_eq!(log.opened, SOURCE_PRIORITY.to_vec());
    assert_eq!(log.released, 1);
    assert_eq!(log.open_handles, 1);
}
