//! Conversions between whole seconds and the `mm:ss` display form.

use super::error::{RadioError, RadioResult};

/// Longest track accepted into a DJ queue, in seconds.
pub const MAX_QUEUE_TRACK_SECONDS: u32 = 600;

/// Formats seconds as `mm:ss`. Minutes are never folded into hours, so
/// an hour-long track renders as `60:00`.
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn parse_component(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok()
}

/// Parses `mm:ss` into whole seconds.
pub fn parse_mmss(value: &str) -> RadioResult<u32> {
    let invalid = || RadioError::InvalidDuration(value.to_string());

    let (minutes, seconds) = value.trim().split_once(':').ok_or_else(invalid)?;
    let minutes = parse_component(minutes).ok_or_else(invalid)?;
    let seconds = parse_component(seconds).ok_or_else(invalid)?;
    if seconds > 59 {
        return Err(invalid());
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(invalid)
}

/// Parses a duration for a queue entry: must be positive and at most ten minutes.
pub fn parse_queue_duration(value: &str) -> RadioResult<u32> {
    let seconds = parse_mmss(value)?;
    if seconds == 0 || seconds > MAX_QUEUE_TRACK_SECONDS {
        return Err(RadioError::InvalidDuration(value.to_string()));
    }
    Ok(seconds)
}
