use std::time::Duration;

/// Convert Duration to MPRIS position in microseconds
pub fn to_mpris_micros(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

/// Render a microsecond count as `m:ss`.
///
/// Negative values clamp to zero; minutes are not wrapped into hours.
pub fn format_time(micros: i64) -> String {
    let total_seconds = micros.max(0) / 1_000_000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}
