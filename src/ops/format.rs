/// Formats seconds as `MM:SS`. Both components are truncated, never rounded.
///
/// Negative and non-finite input renders as `00:00`. Minutes are not wrapped
/// into hours, so an 100-minute source reads `100:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats seconds as `MM:SS.mmm`, used where the 0.01 s seek step matters.
pub fn format_time_precise(seconds: f64) -> String {
    // Round once on the millisecond total so carries reach the minutes.
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let (minutes, rest) = (total_ms / 60_000, total_ms % 60_000);
    format!("{:02}:{:02}.{:03}", minutes, rest / 1000, rest % 1000)
}

/// Human readable byte count for the file details card.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
