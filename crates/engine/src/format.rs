//! Type-directed value presentation.
//!
//! Every cell and detail field goes through [`format_field`], so the list and
//! the detail view agree on how a value looks. Only the placeholder for an
//! absent value differs between the two contexts.

use std::borrow::Cow;

use chrono::DateTime;
use formwork_types::{FieldType, is_present};
use formwork_util::date_handling::{format_date_string, format_datetime_string, format_us_date, format_us_datetime};
use formwork_util::number_format::{format_numeric_value, parse_numeric};
use serde_json::{Number, Value};

/// Placeholder shown by the list for absent values.
pub const LIST_PLACEHOLDER: &str = "N/A";
/// Placeholder shown by the detail view for absent values.
pub const DETAIL_PLACEHOLDER: &str = "—";

/// Where a value is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatContext {
    List,
    Detail,
}

impl FormatContext {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::List => LIST_PLACEHOLDER,
            Self::Detail => DETAIL_PLACEHOLDER,
        }
    }
}

/// Visual hint that travels with the formatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    /// The value was absent.
    Placeholder,
    /// A boolean `true`.
    Affirmative,
    /// A boolean `false`.
    Negative,
}

impl Tone {
    /// Glyph the list shows next to booleans.
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Self::Affirmative => Some("✓"),
            Self::Negative => Some("✗"),
            Self::Plain | Self::Placeholder => None,
        }
    }
}

/// Display text plus its tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub tone: Tone,
}

impl Formatted {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }
}

/// Format `value` for display as a field of type `field_type`.
///
/// Values that cannot be interpreted as their declared type fall back to
/// their raw text rather than failing.
pub fn format_field(value: Option<&Value>, field_type: FieldType, context: FormatContext) -> Formatted {
    let Some(value) = value.filter(|value| is_present(value)) else {
        return Formatted {
            text: context.placeholder().to_string(),
            tone: Tone::Placeholder,
        };
    };

    match field_type {
        FieldType::Date => Formatted::plain(format_date(value).unwrap_or_else(|| string_repr(Some(value)).into_owned())),
        FieldType::DateTime => {
            Formatted::plain(format_datetime(value).unwrap_or_else(|| string_repr(Some(value)).into_owned()))
        }
        FieldType::Number => {
            Formatted::plain(format_numeric_value(value).unwrap_or_else(|| string_repr(Some(value)).into_owned()))
        }
        FieldType::Boolean => match boolean_value(value) {
            Some(true) => Formatted {
                text: "Yes".to_string(),
                tone: Tone::Affirmative,
            },
            Some(false) => Formatted {
                text: "No".to_string(),
                tone: Tone::Negative,
            },
            None => Formatted::plain(string_repr(Some(value))),
        },
        FieldType::Text | FieldType::Select | FieldType::Other => Formatted::plain(string_repr(Some(value))),
    }
}

/// Text-only shorthand for [`format_field`].
pub fn format_value(value: Option<&Value>, field_type: FieldType, context: FormatContext) -> String {
    format_field(value, field_type, context).text
}

/// Interpret a value as a boolean.
///
/// Accepts JSON booleans, the strings `"true"`/`"false"` (any case) and
/// numbers, where zero is false.
pub fn boolean_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

/// The plain string form of a raw value, used for searching, sorting and as
/// the fallback display text. Absent values are the empty string.
pub fn string_repr(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(Value::Bool(flag)) => Cow::Borrowed(if *flag { "true" } else { "false" }),
        Some(Value::Number(number)) => Cow::Owned(number_text(number)),
        Some(Value::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| string_repr(Some(item)).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(object @ Value::Object(_)) => Cow::Owned(object.to_string()),
    }
}

/// Shortest text for a number; integral floats drop their `.0`.
fn number_text(number: &Number) -> String {
    if number.is_f64()
        && let Some(float) = number.as_f64()
        && float.fract() == 0.0
        && float.abs() < 1e21
    {
        return format!("{float:.0}");
    }
    number.to_string()
}

fn format_date(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => format_date_string(text),
        Value::Number(_) => epoch_millis(value).map(|date_time| format_us_date(date_time.date())),
        _ => None,
    }
}

fn format_datetime(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => format_datetime_string(text),
        Value::Number(_) => epoch_millis(value).map(format_us_datetime),
        _ => None,
    }
}

/// Numeric dates are milliseconds since the Unix epoch, read in UTC.
fn epoch_millis(value: &Value) -> Option<chrono::NaiveDateTime> {
    let millis = parse_numeric(value)?;
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|date_time| date_time.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_values_use_context_placeholder() {
        assert_eq!(format_value(None, FieldType::Text, FormatContext::List), "N/A");
        assert_eq!(format_value(None, FieldType::Number, FormatContext::Detail), "—");
        assert_eq!(format_value(Some(&json!("")), FieldType::Text, FormatContext::List), "N/A");
        assert_eq!(format_value(Some(&Value::Null), FieldType::Boolean, FormatContext::Detail), "—");
        assert_eq!(format_field(None, FieldType::Text, FormatContext::List).tone, Tone::Placeholder);
    }

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_value(Some(&json!(1200.5)), FieldType::Number, FormatContext::List), "1,200.5");
        assert_eq!(format_value(Some(&json!(1234567)), FieldType::Number, FormatContext::Detail), "1,234,567");
        assert_eq!(format_value(Some(&json!("2500")), FieldType::Number, FormatContext::List), "2,500");
        assert_eq!(format_value(Some(&json!("lots")), FieldType::Number, FormatContext::List), "lots");
    }

    #[test]
    fn booleans_read_yes_no() {
        let yes = format_field(Some(&json!(true)), FieldType::Boolean, FormatContext::List);
        assert_eq!(yes.text, "Yes");
        assert_eq!(yes.tone, Tone::Affirmative);
        assert_eq!(yes.tone.glyph(), Some("✓"));
        assert_eq!(format_value(Some(&json!(false)), FieldType::Boolean, FormatContext::Detail), "No");
        assert_eq!(format_value(Some(&json!("true")), FieldType::Boolean, FormatContext::List), "Yes");
        assert_eq!(format_value(Some(&json!("FALSE")), FieldType::Boolean, FormatContext::List), "No");
        assert_eq!(format_value(Some(&json!(0)), FieldType::Boolean, FormatContext::List), "No");
        assert_eq!(format_value(Some(&json!("maybe")), FieldType::Boolean, FormatContext::List), "maybe");
    }

    #[test]
    fn dates_and_datetimes_use_us_order() {
        assert_eq!(format_value(Some(&json!("2024-03-09")), FieldType::Date, FormatContext::List), "3/9/2024");
        assert_eq!(
            format_value(Some(&json!("2024-03-09T14:05:06Z")), FieldType::DateTime, FormatContext::Detail),
            "3/9/2024, 2:05:06 PM"
        );
        assert_eq!(format_value(Some(&json!("someday")), FieldType::Date, FormatContext::List), "someday");
        assert_eq!(format_value(Some(&json!(0)), FieldType::Date, FormatContext::List), "1/1/1970");
    }

    #[test]
    fn formatting_is_idempotent_for_dates() {
        let once = format_value(Some(&json!("2024-12-31T23:59:59")), FieldType::DateTime, FormatContext::List);
        let twice = format_value(Some(&json!(once.clone())), FieldType::DateTime, FormatContext::List);
        assert_eq!(once, twice);
    }

    #[test]
    fn string_repr_matches_plain_text_forms() {
        assert_eq!(string_repr(None), "");
        assert_eq!(string_repr(Some(&json!("London"))), "London");
        assert_eq!(string_repr(Some(&json!(10))), "10");
        assert_eq!(string_repr(Some(&json!(10.0))), "10");
        assert_eq!(string_repr(Some(&json!(1200.5))), "1200.5");
        assert_eq!(string_repr(Some(&json!(true))), "true");
        assert_eq!(string_repr(Some(&json!(["a", 1, null]))), "a,1,");
        assert_eq!(string_repr(Some(&json!({"k": 1}))), r#"{"k":1}"#);
    }

    #[test]
    fn text_and_select_render_raw() {
        assert_eq!(format_value(Some(&json!("Open")), FieldType::Select, FormatContext::List), "Open");
        assert_eq!(format_value(Some(&json!(42)), FieldType::Text, FormatContext::List), "42");
    }
}
