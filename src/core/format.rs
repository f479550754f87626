//! Display formatting for prices, ratios, counts and timestamps.

use chrono::{DateTime, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// Rendered in place of any value the backend did not supply.
pub const PLACEHOLDER: &str = "--";

/// Format a share or ETH price as dollars: up to 4 decimal places, trailing
/// zeros trimmed but never below 2. `None` renders as "$--".
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", trim_decimals(v, 4, 2)),
        None => format!("${PLACEHOLDER}"),
    }
}

/// Format an mNAV ratio with fixed 6 decimal places.
pub fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a share count or holding with thousands separators. Fractional
/// parts are kept up to 3 digits, trimmed.
pub fn count(value: f64) -> String {
    let negative = value < 0.0;
    let total_milli = (value.abs() * 1000.0).round() as u64;
    let int_part = total_milli / 1000;
    let frac_milli = total_milli % 1000;

    let mut grouped = String::new();
    let digits = int_part.to_string();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac_milli > 0 {
        let frac = format!("{frac_milli:03}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

pub fn count_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => count(v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render a number the way it should appear inside an editable form field:
/// integral values without a fraction, everything else via the shortest
/// round-trip representation.
pub fn input_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Convert a server-supplied UTC timestamp into a localized display string
/// with an explicit UTC-offset suffix. Malformed input is echoed back
/// unmodified rather than failing.
pub fn local_time(raw: &str) -> String {
    match parse_utc_timestamp(raw) {
        Some(utc) => {
            let local = utc.with_timezone(&Local);
            let offset = local.offset().fix().local_minus_utc();
            format!(
                "{} {}",
                local.format("%Y-%m-%d %H:%M:%S"),
                utc_offset_suffix(offset)
            )
        }
        None => raw.to_string(),
    }
}

/// Parse the timestamp shapes the backend emits: RFC 3339, or a naive
/// ISO-8601 datetime (Python `isoformat`, sqlite column) taken as UTC.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// "(UTC+08:00)"-style suffix for a timezone offset given in seconds.
pub fn utc_offset_suffix(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let magnitude = offset_seconds.unsigned_abs();
    let hours = magnitude / 3600;
    let minutes = (magnitude % 3600) / 60;
    format!("(UTC{sign}{hours:02}:{minutes:02})")
}

fn trim_decimals(value: f64, max_places: usize, min_places: usize) -> String {
    let formatted = format!("{value:.max_places$}");
    let dot = match formatted.find('.') {
        Some(i) => i,
        None => return formatted,
    };
    let mut end = formatted.len();
    while end - dot - 1 > min_places && formatted.as_bytes()[end - 1] == b'0' {
        end -= 1;
    }
    formatted[..end].to_string()
}
