//! Countdown display formatting

/// Format a second count as `MM:SS`, or `-MM:SS` when negative
///
/// Minutes are not wrapped at 60.
pub fn format_elapsed(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}
