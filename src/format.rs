//! Value formatting for panel rows.

use chrono::{DateTime, Duration, Utc};

/// Format a duration for display: seconds below a minute, then minutes,
/// then hours with one decimal.
pub fn duration_string(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else {
        format!("{:.1} hours", seconds as f64 / 3600.0)
    }
}

/// Format a distance: meters below a kilometer, kilometers above.
pub fn meters_string(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn meters_per_second_string(mps: f64) -> String {
    format!("{:.1} m/s", mps)
}

pub fn hertz_string(hz: f64) -> String {
    format!("{:.1} Hz", hz)
}

pub fn accuracy_string(meters: f64) -> String {
    format!("{:.0} metres", meters)
}

/// Clock time for timeline row titles.
pub fn clock_time(time: DateTime<Utc>) -> String {
    time.format("%H:%M").to_string()
}

/// Timestamp prefix for log lines.
pub fn log_time(time: DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}

/// How long ago a moment was, relative to `now`.
pub fn age_string(moment: DateTime<Utc>, now: DateTime<Utc>) -> String {
    duration_string(now - moment)
}
