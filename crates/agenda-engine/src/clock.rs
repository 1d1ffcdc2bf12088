//! Wall-clock time parsing and formatting for caller input.

use chrono::NaiveTime;

use crate::error::{AgendaError, Result};

const CLOCK_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M:%S", "%H:%M"];

/// Parse `"9:30 AM"`, `"9:30pm"`, `"14:05"` or `"14:05:30"` into a local time.
///
/// `12 AM` is midnight and `12 PM` is noon.
///
/// # Errors
/// Returns `AgendaError::InvalidClockTime` when no accepted format matches.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| AgendaError::InvalidClockTime(input.to_string()))
}

/// Format as a 12-hour clock, e.g. `"9:30 AM"`.
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
