//! Human-readable rendering of counts and durations.
//!
//! Compact forms scale by powers of one thousand (`1.2M`), full forms keep
//! every digit with thousands separators (`1,234,567`), and durations use
//! compound magnitude-unit notation (`1.5ms`, `1m32s`). All functions here
//! are pure.

use std::time::Duration;

const SI_PREFIXES: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

/// Scale `value` into `[1, 1000)` against the largest fitting SI prefix and
/// render the mantissa with at most `decimals` fractional digits.
///
/// The mantissa is truncated, not rounded, and trailing zeros are trimmed:
/// `format_compact(1_234_567.0, 1)` is `"1.2M"` while
/// `format_compact(42.0, 1)` is `"42"`. With `decimals` of zero no decimal
/// point is printed.
#[must_use]
pub fn format_compact(value: f64, decimals: usize) -> String {
    let (mantissa, prefix) = scale_si(value);
    format!("{}{}", truncate_digits(mantissa, decimals), prefix)
}

/// Render `value` unscaled with comma thousands separators:
/// `format_full(1_234_567.0, 0)` is `"1,234,567"`.
#[must_use]
pub fn format_full(value: f64, decimals: usize) -> String {
    let text = truncate_digits(value, decimals);
    match text.split_once('.') {
        Some((int_part, frac)) => format!("{}.{frac}", group_thousands(int_part)),
        None => group_thousands(&text),
    }
}

/// Render `d` in compound duration notation, truncated to microsecond
/// resolution first (sub-microsecond precision is discarded, not rounded).
///
/// Durations below one second use the largest fitting unit (`250µs`,
/// `1.5ms`); from one second up, seconds carry the trimmed fractional part
/// and are prefixed by minutes and hours, including zero mid-units
/// (`2s`, `1m32s`, `1h0m12s`). A zero duration renders `0s`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros == 0 {
        return "0s".to_string();
    }
    if micros < 1_000 {
        return format!("{micros}µs");
    }
    if micros < 1_000_000 {
        return format!("{}ms", with_frac(micros / 1_000, micros % 1_000, 3));
    }
    let secs = micros / 1_000_000;
    let seconds = format!("{}s", with_frac(secs % 60, micros % 1_000_000, 6));
    if secs < 60 {
        return seconds;
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes}m{seconds}");
    }
    format!("{}h{}m{}", minutes / 60, minutes % 60, seconds)
}

fn scale_si(value: f64) -> (f64, &'static str) {
    let mut idx = 0;
    let mut scale = 1.0f64;
    while value / scale >= 1000.0 && idx < SI_PREFIXES.len() - 1 {
        scale *= 1000.0;
        idx += 1;
    }
    (value / scale, SI_PREFIXES[idx])
}

/// Cut `value` to `decimals` fractional digits without rounding, dropping
/// trailing zeros and a bare decimal point.
///
/// Works on the shortest round-trip decimal form so values that sit just
/// below their decimal representation (`1.2f64`) do not lose their last
/// kept digit.
fn truncate_digits(value: f64, decimals: usize) -> String {
    let text = value.to_string();
    match text.split_once('.') {
        None => text,
        Some((int_part, frac)) => {
            let kept = frac[..frac.len().min(decimals)].trim_end_matches('0');
            if kept.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{kept}")
            }
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn with_frac(whole: u128, frac: u128, width: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let mut digits = format!("{frac:0width$}");
    while digits.ends_with('0') {
        digits.pop();
    }
    format!("{whole}.{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_scales_and_truncates() {
        assert_eq!(format_compact(0.0, 1), "0");
        assert_eq!(format_compact(42.0, 1), "42");
        assert_eq!(format_compact(999.0, 1), "999");
        assert_eq!(format_compact(1_000.0, 0), "1k");
        assert_eq!(format_compact(1_234_567.0, 1), "1.2M");
        assert_eq!(format_compact(1_234_567.0, 0), "1M");
        assert_eq!(format_compact(12_345.0, 2), "12.34k");
        assert_eq!(format_compact(1_500_000_000.0, 1), "1.5G");
    }

    #[test]
    fn compact_truncates_instead_of_rounding_up() {
        // 999_999 must not roll over into "1000k".
        assert_eq!(format_compact(999_999.0, 1), "999.9k");
        assert_eq!(format_compact(1_299_999.0, 1), "1.2M");
    }

    #[test]
    fn full_groups_thousands() {
        assert_eq!(format_full(0.0, 0), "0");
        assert_eq!(format_full(100.0, 0), "100");
        assert_eq!(format_full(1_000.0, 0), "1,000");
        assert_eq!(format_full(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_full(987_654_321.0, 0), "987,654,321");
    }

    #[test]
    fn compact_and_full_agree_up_to_rendered_precision() {
        for value in [0u64, 1, 42, 999, 1_000, 65_536, 1_234_567, 9_876_543_210] {
            let compact = format_compact(value as f64, 1);
            let full = format_full(value as f64, 0);

            let full_value: f64 = full.replace(',', "").parse().unwrap();
            assert_eq!(full_value, value as f64);

            let (mantissa_text, scale) = match compact.char_indices().last().unwrap() {
                (i, 'k') => (&compact[..i], 1e3),
                (i, 'M') => (&compact[..i], 1e6),
                (i, 'G') => (&compact[..i], 1e9),
                _ => (compact.as_str(), 1.0),
            };
            let compact_value: f64 = mantissa_text.parse::<f64>().unwrap() * scale;

            // Truncation only ever undershoots, by less than one unit of
            // the last rendered digit.
            assert!(compact_value <= value as f64, "{compact} vs {value}");
            assert!(value as f64 - compact_value < scale / 10.0, "{compact} vs {value}");
        }
    }

    #[test]
    fn duration_zero_and_submicrosecond() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(500)), "0s");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1µs");
    }

    #[test]
    fn duration_subsecond_units() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_micros(999_999)), "999.999ms");
        assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
    }

    #[test]
    fn duration_compound_units() {
        assert_eq!(format_duration(Duration::from_secs(2)), "2s");
        assert_eq!(format_duration(Duration::from_secs(92)), "1m32s");
        assert_eq!(format_duration(Duration::from_millis(90_500)), "1m30.5s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m0s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_secs(3_661)), "1h1m1s");
        assert_eq!(format_duration(Duration::from_secs(86_400)), "24h0m0s");
    }

    #[test]
    fn duration_formatting_is_idempotent_under_truncation() {
        let raw = Duration::from_secs(1) + Duration::from_nanos(1_500);
        let truncated = Duration::from_micros(u64::try_from(raw.as_micros()).unwrap());
        assert_eq!(format_duration(raw), format_duration(truncated));
        assert_eq!(format_duration(raw), "1.000001s");
    }
}
