//! Timestamp parsing for transaction events.
//!
//! Input timestamps look like `2019-02-13T10:00:00.123Z`, with the
//! fractional-millisecond suffix optional. They are collapsed into a single
//! comparison unit: milliseconds since the Unix epoch, as an `i64`.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Length of the whole-seconds portion, `YYYY-MM-DDTHH:MM:SS`.
const SECONDS_LEN: usize = 19;

/// Error parsing a timestamp string.
#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("timestamp '{0}' is too short")]
    TooShort(String),

    #[error("timestamp '{0}': {1}")]
    InvalidDateTime(String, chrono::ParseError),

    #[error("timestamp '{0}': millisecond suffix out of range")]
    MillisOutOfRange(String),
}

/// Parse an ISO-8601-like timestamp (`YYYY-MM-DDTHH:MM:SS[.fff]Z`) into
/// milliseconds since the Unix epoch.
///
/// The `Z` suffix denotes UTC, and the seconds part is interpreted as UTC
/// regardless of the local timezone. When a fractional suffix is present
/// (string longer than 20 characters), the run of digits after the dot is
/// taken as the millisecond count; otherwise milliseconds are 0.
pub fn parse_epoch_millis(ts: &str) -> Result<i64, TimestampError> {
    let seconds_part = ts
        .get(..SECONDS_LEN)
        .ok_or_else(|| TimestampError::TooShort(ts.to_string()))?;

    let datetime = NaiveDateTime::parse_from_str(seconds_part, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| TimestampError::InvalidDateTime(ts.to_string(), e))?;

    let millis = match ts.get(SECONDS_LEN + 1..) {
        Some(suffix) if !suffix.is_empty() => {
            let digits: &str = &suffix[..suffix
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(suffix.len())];
            if digits.is_empty() {
                0
            } else {
                digits
                    .parse::<i64>()
                    .map_err(|_| TimestampError::MillisOutOfRange(ts.to_string()))?
            }
        }
        _ => 0,
    };

    Ok(datetime.and_utc().timestamp() * 1000 + millis)
}
