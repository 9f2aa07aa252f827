// Utility helpers for number cleaning and rendering.
//
// This module centralizes the "dirty" numeric handling so the aggregators
// can assume clean `f64` values.
use num_format::{Locale, ToFormattedString};

/// Parse a float the forgiving way: surrounding whitespace is ignored,
/// everything else must be a valid `f64` literal.
pub fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Case counts with no digit at all (blank cells, `"-"`, `"NA"`) count as
/// zero. Anything carrying a digit must parse; `None` means it did not.
pub fn clean_case_count(raw: &str) -> Option<f64> {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Some(0.0);
    }
    parse_f64(raw)
}

/// Negative rainfall readings are sensor noise and clamp to zero.
pub fn clean_rainfall(raw: &str) -> Option<f64> {
    let mm = parse_f64(raw)?;
    if mm < 0.0 {
        Some(0.0)
    } else {
        Some(mm)
    }
}

/// Round to `decimals` places by going through the shortest exact decimal
/// rendering, so `3.14159` becomes `3.1` and not `3.1000000000000001`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Render a float the way the downstream consumers of the report expect:
/// always with a fractional part (`5.0`), shortest round-trip digits
/// otherwise, and a signed two-digit exponent for very large or very small
/// magnitudes (`1e+16`, `1e-05`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // `Debug` already gives shortest round-trip digits with a `.0` suffix
    // and switches to exponent form at the same thresholds.
    let s = format!("{:?}", value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `12,345 records read`).
    n.to_formatted_string(&Locale::en)
}
