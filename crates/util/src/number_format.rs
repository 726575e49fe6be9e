//! Grouped (en-US) number presentation: `1200.5` → `1,200.5`.

use serde_json::{Number, Value};

/// Maximum digits kept after the decimal point.
const MAX_FRACTION_DIGITS: usize = 3;

/// Formats a JSON number with thousands separators.
///
/// Integers are grouped exactly; floats are rounded to at most three
/// fraction digits with trailing zeros removed.
pub fn format_json_number(number: &Number) -> String {
    if let Some(integer) = number.as_i64() {
        return group_integer_text(&integer.to_string());
    }
    if let Some(integer) = number.as_u64() {
        return group_integer_text(&integer.to_string());
    }
    format_grouped(number.as_f64().unwrap_or(f64::NAN))
}

/// Formats a float with thousands separators and up to three fraction digits.
///
/// # Example
/// ```rust
/// use formwork_util::number_format::format_grouped;
///
/// assert_eq!(format_grouped(1200.5), "1,200.5");
/// assert_eq!(format_grouped(-1234567.0), "-1,234,567");
/// assert_eq!(format_grouped(0.12345), "0.123");
/// ```
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-∞".to_string() } else { "∞".to_string() };
    }
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let (integer_part, fraction_part) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let mut grouped = group_integer_text(integer_part);
    if grouped == "-0" {
        grouped = "0".to_string();
    }
    if fraction_part.is_empty() {
        grouped
    } else {
        if grouped == "0" && value.is_sign_negative() {
            grouped = "-0".to_string();
        }
        format!("{grouped}.{fraction_part}")
    }
}

/// Reads a numeric value from a JSON number or a numeric string.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

/// Formats a numeric JSON value (number or numeric string); `None` otherwise.
pub fn format_numeric_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(format_json_number(number)),
        Value::String(_) => parse_numeric(value).map(format_grouped),
        _ => None,
    }
}

fn group_integer_text(digits: &str) -> String {
    let (sign, body) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(body.len() + body.len() / 3 + 1);
    for (index, ch) in body.chars().enumerate() {
        if index > 0 && (body.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_integers_and_floats() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1200.5), "1,200.5");
        assert_eq!(format_grouped(-0.5), "-0.5");
        assert_eq!(format_grouped(-0.0), "0");
        assert_eq!(format_grouped(1234.5678), "1,234.568");
    }

    #[test]
    fn json_numbers_keep_integer_precision() {
        let big = json!(9007199254740993u64);
        let Value::Number(number) = &big else { panic!("number") };
        assert_eq!(format_json_number(number), "9,007,199,254,740,993");
    }

    #[test]
    fn numeric_strings_are_formatted_others_are_not() {
        assert_eq!(format_numeric_value(&json!("1234.50")), Some("1,234.5".to_string()));
        assert_eq!(format_numeric_value(&json!(" 10 ")), Some("10".to_string()));
        assert_eq!(format_numeric_value(&json!("ten")), None);
        assert_eq!(format_numeric_value(&json!(true)), None);
        assert_eq!(parse_numeric(&json!("2")), Some(2.0));
    }
}
