//! Display helpers for playback times.

/// Format a position in seconds as `m:ss`.
///
/// Anything that is not a finite, non-negative number renders as `0:00`.
pub fn fmt_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format an optional duration, treating an unknown length like the browser's `NaN`.
pub fn fmt_opt_time(secs: Option<f64>) -> String {
    fmt_time(secs.unwrap_or(f64::NAN))
}
