/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use lens_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge exact binary midpoints (1.005 and friends) upward before rounding.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // "0.50" → ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an optional summary value; missing values render as `"-"`.
///
/// ```
/// use lens_core::formatting::format_optional;
///
/// assert_eq!(format_optional(Some(61.25), 1), "61.3");
/// assert_eq!(format_optional(None, 1), "-");
/// ```
pub fn format_optional(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) if v.is_finite() => format_number(v, decimals),
        _ => "-".to_string(),
    }
}

/// Format a duration in hours as `"45m"`, `"3h"` or `"3h 45m"`.
///
/// ```
/// use lens_core::formatting::format_hours;
///
/// assert_eq!(format_hours(0.75), "45m");
/// assert_eq!(format_hours(8.0), "8h");
/// assert_eq!(format_hours(3.75), "3h 45m");
/// ```
pub fn format_hours(hours: f64) -> String {
    let total_mins = (hours * 60.0).round() as i64;
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let h = total_mins / 60;
        let m = total_mins % 60;
        if m == 0 {
            format!("{}h", h)
        } else {
            format!("{}h {}m", h, m)
        }
    }
}

/// `(part / whole) * 100`, or `None` when `whole` is zero.
pub fn ratio_percent(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        return None;
    }
    Some(part / whole * 100.0)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
