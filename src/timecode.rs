/*!
 * WebVTT timecode conversion.
 *
 * Converts between `HH:MM:SS.mmm` text and seconds as `f64`, losslessly to
 * millisecond precision. Hours may be any width and are omitted by some
 * encoders (`MM:SS.mmm`), which is accepted on input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::VttError;

// @const: WebVTT timestamp regex, hours optional
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})$").unwrap()
});

// Absorbs binary representation error (1.001 * 1000 = 1000.9999...) before truncating.
const MS_EPSILON: f64 = 1e-6;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Parse a `HH:MM:SS.mmm` timecode into seconds.
///
/// Each field left of the seconds is worth 60 times the field to its right.
/// Minutes and seconds must be below 60.
pub fn parse_timecode(text: &str) -> Result<f64, VttError> {
    let malformed = || VttError::MalformedTimecode {
        input: text.to_string(),
    };

    let caps = TIMECODE_REGEX.captures(text.trim()).ok_or_else(malformed)?;

    let field = |idx: usize| -> Result<u64, VttError> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u64>().map_err(|_| malformed()),
            None => Ok(0),
        }
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(malformed());
    }

    let total_ms = hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(malformed)?;

    Ok(total_ms as f64 / MS_PER_SECOND as f64)
}

/// Format seconds as a `HH:MM:SS.mmm` timecode.
///
/// Sub-millisecond remainders are truncated, never rounded. Hours are padded to
/// two digits but wider values are kept whole. Negative and NaN inputs clamp to zero.
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = to_millis(seconds);

    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Whole milliseconds contained in `seconds`, truncated.
pub fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * MS_PER_SECOND as f64 + MS_EPSILON).floor() as u64
}
