//! # Date Handling Utilities
//!
//! Parsing of the date and date-time spellings records arrive with, and
//! formatting into the fixed en-US presentation used by the renderers:
//!
//! - dates: `M/D/YYYY` (e.g. `1/5/2024`)
//! - date-times: `M/D/YYYY, h:mm:ss AM` (e.g. `1/5/2024, 3:04:05 PM`)
//!
//! Both presentations parse back through the same functions, so formatting is
//! idempotent.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Parses a date from RFC3339, ISO (`YYYY-MM-DD`, `YYYY/MM/DD`), US
/// (`M/D/YYYY`) or any supported date-time spelling.
///
/// Timestamps keep the calendar date in their own offset; no conversion to
/// the viewer's timezone takes place.
///
/// # Example
/// ```rust
/// use formwork_util::date_handling::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2023, 12, 25);
/// assert_eq!(parse_date("2023-12-25"), expected);
/// assert_eq!(parse_date("12/25/2023"), expected);
/// assert_eq!(parse_date("2023-12-25T23:30:00-05:00"), expected);
/// assert_eq!(parse_date("invalid"), None);
/// ```
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| parse_datetime(trimmed).map(|date_time| date_time.date()))
}

/// Parses a date-time. Plain dates are accepted as midnight.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date_time.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Formats a date as `M/D/YYYY`.
pub fn format_us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Formats a date-time as `M/D/YYYY, h:mm:ss AM`.
pub fn format_us_datetime(date_time: NaiveDateTime) -> String {
    let (is_pm, hour) = date_time.hour12();
    format!(
        "{}, {}:{:02}:{:02} {}",
        format_us_date(date_time.date()),
        hour,
        date_time.minute(),
        date_time.second(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Parses and formats a date string; `None` if it is not a recognizable date.
pub fn format_date_string(input: &str) -> Option<String> {
    parse_date(input).map(format_us_date)
}

/// Parses and formats a date-time string; `None` if unrecognizable.
pub fn format_datetime_string(input: &str) -> Option<String> {
    parse_datetime(input).map(format_us_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_without_padding() {
        assert_eq!(format_date_string("2024-01-05"), Some("1/5/2024".to_string()));
        assert_eq!(format_date_string("2023/06/15"), Some("6/15/2023".to_string()));
        assert_eq!(format_date_string("2023-12-25T10:30:00Z"), Some("12/25/2023".to_string()));
        assert_eq!(format_date_string("2023-13-45"), None);
        assert_eq!(format_date_string(""), None);
    }

    #[test]
    fn formats_datetimes_in_twelve_hour_clock() {
        assert_eq!(
            format_datetime_string("2024-01-05T15:04:05Z"),
            Some("1/5/2024, 3:04:05 PM".to_string())
        );
        assert_eq!(
            format_datetime_string("2024-01-05 00:10:00"),
            Some("1/5/2024, 12:10:00 AM".to_string())
        );
        assert_eq!(format_datetime_string("2024-01-05"), Some("1/5/2024, 12:00:00 AM".to_string()));
        assert_eq!(format_datetime_string("soon"), None);
    }

    #[test]
    fn formatted_output_parses_back() {
        let once = format_date_string("2024-11-30").expect("date");
        assert_eq!(format_date_string(&once), Some(once.clone()));

        let once = format_datetime_string("2024-11-30T18:45:09+02:00").expect("datetime");
        assert_eq!(once, "11/30/2024, 6:45:09 PM");
        assert_eq!(format_datetime_string(&once), Some(once.clone()));
    }
}
