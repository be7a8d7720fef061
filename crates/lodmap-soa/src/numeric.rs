//! Number parsing and formatting for map text.
//!
//! Maps written on machines with a comma decimal separator contain values
//! like `2,3`, and hashes appear both as signed and unsigned 32-bit integers.

use crate::error::{FormatError, Result};

/// Significant digits used for every float written to a map.
const SIGNIFICANT_DIGITS: i32 = 6;

/// Parse a float, accepting `,` as the decimal separator.
pub fn parse_locale_float(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| FormatError::numeric(field, trimmed))
}

/// Parse an integer token that may be written in signed or unsigned
/// 32-bit form (or as a float with no fractional part).
pub fn parse_wide_int(field: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    match parse_locale_float(field, trimmed) {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(FormatError::numeric(field, trimmed)),
    }
}

/// Parse a whole number that is stored truncated to an integer.
pub fn parse_truncated(field: &str, text: &str) -> Result<f64> {
    parse_locale_float(field, text).map(f64::trunc)
}

/// Reinterpret a 32-bit value as signed.
///
/// Values in `[2^31, 2^32)` become `value - 2^32`; values already in `i32`
/// range are unchanged.
pub fn to_signed32(value: i64) -> i32 {
    let unsigned = value as u32;
    if unsigned > i32::MAX as u32 {
        (unsigned as i64 - (1i64 << 32)) as i32
    } else {
        unsigned as i32
    }
}

/// Reinterpret a 32-bit value as unsigned (negative values wrap).
pub fn to_unsigned32(value: i64) -> u32 {
    value as u32
}

/// Clamp to `[0, 255]` and truncate.
pub fn clamp_to_byte(x: f64) -> u8 {
    if x.is_nan() {
        return 0;
    }
    x.clamp(0.0, 255.0) as u8
}

/// Format like C's `%.6g`: six significant digits, trailing zeros removed,
/// exponent notation outside `1e-4..1e6`.
pub fn format_g6(x: f64) -> String {
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

/// 32-bit FNV-1a hash of a light name, used when a light carries no hash.
pub fn name_hash(name: &str) -> i64 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    let hash = name
        .bytes()
        .fold(OFFSET, |h, b| (h ^ b as u32).wrapping_mul(PRIME));
    hash as i64
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
