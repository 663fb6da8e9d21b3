//! Lenient conversions from upstream JSON values to numbers and dates.
//!
//! None of these functions fail: a value that cannot be converted falls back
//! to zero or `None` so one bad record never blanks out a whole report.

use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The length of a `YYYY-MM-DD` date string.
const DATE_LENGTH: usize = 10;

/// Converts a JSON number or numeric string to a finite `f64`.
///
/// Anything else (null, booleans, objects, unparseable strings, NaN or
/// infinity) becomes `0.0`.
pub fn to_amount(raw: &Value) -> f64 {
    let amount = match raw {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if amount.is_finite() { amount } else { 0.0 }
}

/// Parses a `YYYY-MM-DD` date.
///
/// ISO date-times are accepted too, as long as the date is followed by a `T`
/// or a space, e.g. "2025-01-05T10:00:00Z". Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();

    let date_part = match raw.char_indices().nth(DATE_LENGTH) {
        None => raw,
        Some((index, 'T' | ' ')) => &raw[..index],
        Some(_) => return None,
    };

    Date::parse(date_part, DATE_FORMAT).ok()
}

/// Whether `date` falls in `month` (1-12) of `year`.
pub(crate) fn date_in_month(date: Date, year: i32, month: u8) -> bool {
    date.year() == year && u8::from(date.month()) == month
}

/// Whether the date string `date` falls in `month` (1-12) of `year`.
///
/// Unparseable dates are never in any month.
pub fn is_same_month(date: &str, year: i32, month: u8) -> bool {
    parse_date(date).is_some_and(|date| date_in_month(date, year, month))
}

/// A zero-padded "YYYY-MM" key whose lexicographic order is chronological.
pub fn month_key(year: i32, month: u8) -> String {
    format!("{year:04}-{month:02}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{is_same_month, month_key, parse_date, to_amount};

    #[test]
    fn to_amount_reads_numbers_and_numeric_strings() {
        assert_eq!(to_amount(&json!(12.5)), 12.5);
        assert_eq!(to_amount(&json!(300)), 300.0);
        assert_eq!(to_amount(&json!(" 42.10 ")), 42.1);
    }

    #[test]
    fn to_amount_falls_back_to_zero() {
        assert_eq!(to_amount(&json!(null)), 0.0);
        assert_eq!(to_amount(&json!("twelve")), 0.0);
        assert_eq!(to_amount(&json!(true)), 0.0);
        assert_eq!(to_amount(&json!({"value": 1})), 0.0);
        assert_eq!(to_amount(&json!("NaN")), 0.0);
        assert_eq!(to_amount(&json!("inf")), 0.0);
    }

    #[test]
    fn parse_date_accepts_dates_and_iso_date_times() {
        assert_eq!(parse_date("2025-01-05"), Some(date!(2025 - 01 - 05)));
        assert_eq!(
            parse_date("2025-01-05T23:10:00.000Z"),
            Some(date!(2025 - 01 - 05))
        );
        assert_eq!(parse_date("2025-01-05 08:00"), Some(date!(2025 - 01 - 05)));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("2025-01-051"), None);
    }

    #[test]
    fn is_same_month_is_false_for_unparseable_dates() {
        assert!(is_same_month("2025-01-31", 2025, 1));
        assert!(!is_same_month("2025-02-01", 2025, 1));
        assert!(!is_same_month("2024-01-15", 2025, 1));
        assert!(!is_same_month("yesterday", 2025, 1));
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let mut keys = vec![month_key(2025, 10), month_key(2024, 12), month_key(2025, 2)];
        keys.sort();

        assert_eq!(keys, vec!["2024-12", "2025-02", "2025-10"]);
    }
}
