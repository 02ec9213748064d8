mod index;
mod naming;

pub use {
    index::{
        CALL_LOG_WINDOW, CallLogEntry, CallLogLookup, NoCallLog, RecordedCallRecord,
        RecordingIndex,
    },
    naming::{
        CURRENT_TAG, LEGACY_TAG, ParsedRecordingName, RECORDING_EXT, TIMESTAMP_FORMAT,
        build_file_name, parse_file_name, sanitize_number,
    },
};
