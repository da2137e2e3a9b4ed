//! String-to-number coercion and number-to-string formatting.
//!
//! Parsing follows the JavaScript `Number(string)` conversion: it never fails,
//! and NaN is the "not a number" answer. Formatting is the general format with
//! 15 significant digits used when numbers are interpolated into strings.

use crate::value::Value;

/// Significant digits kept when formatting a number.
const SIGNIFICANT_DIGITS: usize = 15;

/// Decimal exponent at or above which formatting switches to scientific.
const MAX_FIXED_EXPONENT: i32 = SIGNIFICANT_DIGITS as i32;

/// Decimal exponent below which formatting switches to scientific.
const MIN_FIXED_EXPONENT: i32 = -4;

// ══════════════════════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════════════════════

/// Convert a string to a number the way `Number(s)` does.
///
/// Surrounding whitespace and U+FEFF are ignored and the empty string is `0`.
/// Accepts decimal and scientific notation, `0x`/`0X` hex and `0o` octal
/// integers, and `Infinity` with an optional sign. Anything else is NaN.
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if s.is_empty() {
        return 0.0;
    }

    if is_decimal_literal(s) {
        if let Ok(v) = s.parse::<f64>() {
            return v;
        }
    }

    if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if let Some(v) = parse_radix(digits, 16) {
            return v;
        }
    }

    if let Some(digits) = s.strip_prefix("0o") {
        if let Some(v) = parse_radix(digits, 8) {
            return v;
        }
    }

    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => f64::NAN,
    }
}

/// Only sign, digit, point and exponent characters. Keeps Rust's `inf`/`nan`
/// spellings away from `str::parse`.
fn is_decimal_literal(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// One or more digits in `radix`, accumulated as f64 so large literals lose
/// precision instead of overflowing.
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Numeric view of any value: null is 0, booleans are 0/1, strings go through
/// [`parse_number`], arrays and objects are NaN.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Formatting
// ══════════════════════════════════════════════════════════════════════════════

/// Format a number with up to 15 significant digits.
///
/// Trailing zeros are dropped. Exponents below -4 or at/above 15 use
/// scientific notation with an upper-case `E`, an explicit sign and at least
/// two exponent digits (`1E+15`, `1.5E-07`). Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `d.dddddddddddddde±x`, already rounded to 15 significant digits.
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let digits = digits.trim_end_matches('0');
    // n != 0, so at least one non-zero digit remains
    let (first, rest) = digits.split_at(1);

    let mut out = String::from(sign);
    if !(MIN_FIXED_EXPONENT..MAX_FIXED_EXPONENT).contains(&exp) {
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('E');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.unsigned_abs()));
    } else if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        out.push_str(digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(digits);
            for _ in digits.len()..int_len {
                out.push('0');
            }
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
    out
}
