use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseError};

/// Zone-less local timestamp as written by Telegram Desktop, fractional seconds optional
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Timestamp shown at the start of every rendered line
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a message date
///
/// The zone-less export format is tried first and pinned to offset `+00:00` so its wall-clock
/// fields are kept as written. Full RFC 3339 with an explicit offset is the fallback; the offset
/// is kept rather than converted.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    match NaiveDateTime::parse_from_str(value, LOCAL_FORMAT) {
        Ok(naive) => Ok(naive.and_utc().fixed_offset()),
        Err(_) => DateTime::parse_from_rfc3339(value),
    }
}

pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
