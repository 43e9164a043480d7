//! Loose JSON-to-integer conversion.
//!
//! Values are read the way a "parse the leading integer" routine reads their
//! text form: leading whitespace and a sign are accepted, digits are consumed
//! until the first non-digit, and anything after that is ignored. Values with
//! no leading digits are not coercible.

use serde_json::{Number, Value};

/// Coerce a single JSON value to an integer.
///
/// - strings: leading integer, with `0x`/`0X` selecting hexadecimal
/// - numbers: truncated toward zero
/// - arrays: the coercion of their first element
/// - `null`, booleans, objects: not coercible
///
/// Results outside the `i64` range are treated as not coercible.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => coerce_number(number),
        Value::String(text) => parse_leading_integer(text),
        Value::Array(items) => items.first().and_then(coerce_integer),
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
    }
}

/// Coerce every element, silently dropping the ones that fail. Order is kept.
pub fn coerce_all(values: &[Value]) -> Vec<i64> {
    values.iter().filter_map(coerce_integer).collect()
}

/// Render a value as the text a template literal would produce for it.
pub fn to_prompt_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_prompt_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn coerce_number(number: &Number) -> Option<i64> {
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    if number.is_u64() {
        return None;
    }

    let float = number.as_f64()?;
    let magnitude = float.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        // Exponent notation ("1.5e21"): only the mantissa's leading digit parses.
        return parse_leading_integer(&format!("{:e}", float));
    }

    let truncated = float.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if !number.is_i64() && !number.is_u64() => float_text(float),
        _ => number.to_string(),
    }
}

/// Shortest round-trip form, switching to exponent notation (`1.5e+21`,
/// `1e-7`) outside `[1e-6, 1e21)`.
fn float_text(float: f64) -> String {
    let magnitude = float.abs();
    if float == 0.0 {
        "0".to_string()
    } else if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{:e}", float);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else if float.fract() == 0.0 {
        format!("{:.0}", float)
    } else {
        float.to_string()
    }
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(is_js_whitespace);

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let digits = &body[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).ok()
}
