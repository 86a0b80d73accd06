//! Conversions between wall-clock timestamps and minutes since midnight.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Minutes since midnight for a timestamp, in `[0, 1440)`.
///
/// Seconds and sub-second precision are discarded.
pub fn minutes_since_midnight(timestamp: &NaiveDateTime) -> u16 {
    (timestamp.hour() * 60 + timestamp.minute()) as u16
}

/// Formats minutes since midnight as a short 12-hour time, e.g. `"1:30 PM"`.
///
/// Precondition: `minutes` is in `[0, 1440)`. Out-of-range values are the
/// caller's responsibility to clamp upstream; output for them is unspecified.
pub fn format_time(minutes: u16) -> String {
    let time = NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .unwrap_or(NaiveTime::MIN);
    time.format("%-I:%M %p").to_string()
}
