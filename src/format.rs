const SCALE: f64 = 1024.0;
const UNITS: [&str; 5] = ["TB", "GB", "MB", "KB", "Bytes"];

/// Human readable size. A unit is used only when the value is strictly
/// greater than its threshold, so 1024 stays "1024 Bytes" and 0 or 1
/// fall through to "0 Bytes".
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let mut max = SCALE.powi(UNITS.len() as i32 - 1);
    let value = bytes as f64;

    for unit in UNITS {
        if value > max {
            return format!("{} {}", trim_decimals(value / max), unit);
        }
        max /= SCALE;
    }

    "0 Bytes".to_string()
}

// At most two decimals, half away from zero, no trailing zeros.
fn trim_decimals(value: f64) -> String {
    let hundredths = (value * 100.0).round() as u64;
    let whole = hundredths / 100;
    let frac = hundredths % 100;

    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{}.{}", whole, frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}
