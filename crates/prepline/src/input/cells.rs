//! Cell-level parsing: null tokens and per-column type inference.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::{Column, ColumnType, Value};

/// Tokens read as a missing value (compared case-insensitively after trimming).
const NULL_TOKENS: &[&str] = &["na", "n/a", "null", "none", "nil", "nan", ".", "-"];

// Date shapes accepted in text files, each paired with its chrono format.
static DATE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d"), // ISO date
        (r"^\d{2}/\d{2}/\d{4}$", "%m/%d/%Y"), // US date
        (r"^\d{2}-\d{2}-\d{4}$", "%d-%m-%Y"), // European date
        (r"^\d{4}/\d{2}/\d{2}$", "%Y/%m/%d"), // Alt ISO
    ]
    .into_iter()
    .filter_map(|(pattern, format)| Regex::new(pattern).ok().map(|re| (re, format)))
    .collect()
});

/// Check if a raw cell represents a missing value.
pub fn is_null_token(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_boolean(cell: &str) -> Option<bool> {
    let trimmed = cell.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    DATE_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(trimmed))
        .and_then(|(_, format)| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Build a typed column from raw cells.
///
/// The column type is the first of number, boolean and date that every
/// non-missing cell parses as; otherwise the column is text and cells keep
/// their original spelling. A column with no values is numeric.
pub fn type_column(name: String, cells: Vec<&str>) -> Column {
    let present = || cells.iter().filter(|c| !is_null_token(c));

    let dtype = if present().all(|c| parse_number(c).is_some()) {
        ColumnType::Number
    } else if present().all(|c| parse_boolean(c).is_some()) {
        ColumnType::Boolean
    } else if present().all(|c| parse_date(c).is_some()) {
        ColumnType::Date
    } else {
        ColumnType::Text
    };

    let values = cells
        .iter()
        .map(|cell| {
            if is_null_token(cell) {
                return Value::Missing;
            }
            match dtype {
                ColumnType::Number => parse_number(cell).map_or(Value::Missing, Value::Number),
                ColumnType::Boolean => parse_boolean(cell).map_or(Value::Missing, Value::Boolean),
                ColumnType::Date => parse_date(cell).map_or(Value::Missing, Value::Date),
                ColumnType::Text => Value::text(*cell),
            }
        })
        .collect();

    Column::with_dtype(name, dtype, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_token() {
        assert!(is_null_token(""));
        assert!(is_null_token("  "));
        assert!(is_null_token("NA"));
        assert!(is_null_token("na"));
        assert!(is_null_token("N/A"));
        assert!(is_null_token("null"));
        assert!(is_null_token("NULL"));
        assert!(is_null_token("NaN"));
        assert!(is_null_token("."));
        assert!(is_null_token("-"));
        assert!(!is_null_token("value"));
        assert!(!is_null_token("0"));
    }

    #[test]
    fn test_number_column() {
        let column = type_column("x".into(), vec!["1", " 2.5", "NA", "-3e2"]);
        assert_eq!(column.dtype, ColumnType::Number);
        assert_eq!(
            column.values,
            vec![
                Value::Number(1.0),
                Value::Number(2.5),
                Value::Missing,
                Value::Number(-300.0)
            ]
        );
    }

    #[test]
    fn test_boolean_column() {
        let column = type_column("b".into(), vec!["true", "FALSE", ""]);
        assert_eq!(column.dtype, ColumnType::Boolean);
        assert_eq!(column.values[1], Value::Boolean(false));
        assert!(column.values[2].is_missing());
    }

    #[test]
    fn test_date_column() {
        let column = type_column("d".into(), vec!["2024-01-15", "2024/02/01"]);
        assert_eq!(column.dtype, ColumnType::Date);
        assert_eq!(
            column.values[1],
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_falls_back_to_text() {
        let column = type_column("d".into(), vec!["2024-13-45", "2024-01-01"]);
        assert_eq!(column.dtype, ColumnType::Text);
        assert_eq!(column.values[0], Value::text("2024-13-45"));
    }

    #[test]
    fn test_mixed_column_keeps_text() {
        let column = type_column("m".into(), vec!["1", "abc", " 2 "]);
        assert_eq!(column.dtype, ColumnType::Text);
        assert_eq!(column.values[2], Value::text(" 2 "));
    }

    #[test]
    fn test_infinity_is_text() {
        let column = type_column("i".into(), vec!["inf", "1"]);
        assert_eq!(column.dtype, ColumnType::Text);
    }

    #[test]
    fn test_all_missing_is_number() {
        let column = type_column("e".into(), vec!["", "NA"]);
        assert_eq!(column.dtype, ColumnType::Number);
        assert!(column.is_all_missing());
    }
}
