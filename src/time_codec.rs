//! Text codec for split and winning times
//!
//! Two literal shapes are accepted on input:
//! - `mm:ss.t` as typed by the operator (one tenths digit)
//! - `hh:mm:ss.mmm` as exported by timing spreadsheets (three millisecond digits)
//!
//! Output is always `mm:ss.t`. Minutes wrap at 60; races longer than an hour
//! are not representable in the lap table.

use std::time::Duration;

use crate::{Result, TimingError};

/// Display value of a zero duration.
pub const ZERO_TIME: &str = "00:00.0";

/// Parse time text into a duration.
///
/// Empty text parses to zero. Anything not matching one of the two accepted
/// shapes, or with minutes/seconds outside `0..=59`, fails with
/// [`TimingError::InvalidTimeFormat`].
pub fn parse_time(text: &str) -> Result<Duration> {
    if text.is_empty() {
        return Ok(Duration::ZERO);
    }

    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [minutes, rest] => {
            let minutes = parse_field(text, minutes, "minutes", Some(59))?;
            let (seconds, tenths) = split_fraction(text, rest, 1)?;
            Ok(Duration::from_secs(minutes * 60 + seconds) + Duration::from_millis(tenths * 100))
        }
        [hours, minutes, rest] => {
            let hours = parse_field(text, hours, "hours", Some(99))?;
            let minutes = parse_field(text, minutes, "minutes", Some(59))?;
            let (seconds, millis) = split_fraction(text, rest, 3)?;
            Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds)
                + Duration::from_millis(millis))
        }
        _ => Err(invalid(text, "expected mm:ss.t or hh:mm:ss.mmm")),
    }
}

/// Format a duration as `mm:ss.t`, truncating to tenths.
pub fn format_time(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    let tenths = (duration.as_millis() / 100) % 10;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}

/// Split `ss.f` into whole seconds and a fraction of exactly `digits` digits.
fn split_fraction(text: &str, field: &str, digits: usize) -> Result<(u64, u64)> {
    let (seconds, fraction) =
        field.split_once('.').ok_or_else(|| invalid(text, "invalid seconds format"))?;
    let seconds = parse_field(text, seconds, "seconds", Some(59))?;
    if fraction.len() != digits {
        return Err(invalid(
            text,
            format!("expected {} fractional digit{}", digits, if digits == 1 { "" } else { "s" }),
        ));
    }
    let fraction = parse_field(text, fraction, "fraction", None)?;
    Ok((seconds, fraction))
}

fn parse_field(text: &str, field: &str, name: &str, max: Option<u64>) -> Result<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text, format!("invalid {}", name)));
    }
    let value: u64 = field.parse().map_err(|_| invalid(text, format!("invalid {}", name)))?;
    match max {
        Some(max) if value > max => Err(invalid(text, format!("{} out of range", name))),
        _ => Ok(value),
    }
}

fn invalid(text: &str, details: impl Into<String>) -> TimingError {
    TimingError::InvalidTimeFormat { input: text.to_string(), details: details.into() }
}
