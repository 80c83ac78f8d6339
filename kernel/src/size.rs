const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const BASE: f64 = 1024.0;

/// Formats a byte count the way the dashboard shows it: base 1024,
/// at most two decimals, trailing zeros dropped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return format!("0 {}", UNITS[0]);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= BASE && unit < UNITS.len() - 1 {
        value /= BASE;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
