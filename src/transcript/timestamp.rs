use crate::error::{HighlightError, Result};

/// Convert a caption timestamp to seconds.
///
/// Accepts `H:MM:SS[.mmm]`, `MM:SS[.mmm]` and bare seconds. Either `.` or
/// `,` may separate the fractional part.
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let normalized = timestamp.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => {
            parse_whole(hours, timestamp)? * 3600.0
                + parse_whole(minutes, timestamp)? * 60.0
                + parse_seconds(seconds, timestamp)?
        }
        [minutes, seconds] => {
            parse_whole(minutes, timestamp)? * 60.0 + parse_seconds(seconds, timestamp)?
        }
        [seconds] => parse_seconds(seconds, timestamp)?,
        _ => return Err(HighlightError::InvalidTimestamp(timestamp.to_string())),
    };

    Ok(seconds)
}

fn parse_whole(field: &str, timestamp: &str) -> Result<f64> {
    field
        .parse::<u64>()
        .map(|v| v as f64)
        .map_err(|_| HighlightError::InvalidTimestamp(timestamp.to_string()))
}

fn parse_seconds(field: &str, timestamp: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(HighlightError::InvalidTimestamp(timestamp.to_string())),
    }
}

/// Format seconds for display: `MM:SS` under an hour, `HH:MM:SS` otherwise
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// Format seconds as a WebVTT cue time (`MM:SS.mmm`, minutes unbounded)
pub fn format_vtt_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let minutes = total_millis / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{:02}:{:02}.{:03}", minutes, secs, millis)
}
