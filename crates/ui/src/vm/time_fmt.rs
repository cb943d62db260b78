use chrono::{DateTime, Utc};

/// Calendar date as shown on the dashboard, e.g. `Mar 04, 2025`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %d, %Y").to_string()
}

/// Countdown label, e.g. `0:45`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}

/// Playhead position rounded down to whole seconds.
#[must_use]
pub fn format_playhead(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_countdown(0);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = seconds.floor().min(f64::from(u32::MAX)) as u32;
    format_countdown(whole)
}
