/// Format a position in seconds as `m:ss`, or `h:mm:ss` past the hour.
///
/// Unknown values (negative, NaN, infinite) render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total_secs = seconds.floor() as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Parse a catalog duration label (`ss`, `m:ss` or `h:mm:ss`) into seconds.
pub fn parse_time_label(label: &str) -> Option<f64> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut parts = 0;
    for part in label.split(':') {
        let value: u64 = part.trim().parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
        parts += 1;
    }

    if parts > 3 {
        return None;
    }

    Some(total as f64)
}
