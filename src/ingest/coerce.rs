//! Raw text → typed value coercion

use chrono::NaiveDate;

use crate::models::{ColumnType, Value};

/// Cell texts read as missing regardless of column type
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Accepted input date formats, tried in order
pub const DATE_INPUT_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Coerce one raw cell into `ty`.
///
/// NA tokens become [`Value::Missing`]. Numbers and dates are trimmed before
/// parsing; text is kept verbatim. Integer columns also accept float text with
/// a zero fraction (`"12.0"`). Returns a reason string when the text cannot be
/// represented in the column type.
pub fn coerce(raw: &str, ty: ColumnType) -> Result<Value, String> {
    if NA_TOKENS.contains(&raw) || (ty != ColumnType::Text && raw.trim().is_empty()) {
        return Ok(Value::Missing);
    }

    match ty {
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Integer => parse_integer(raw.trim()),
        ColumnType::Float => parse_float(raw.trim()),
        ColumnType::Date => parse_date(raw.trim()),
    }
}

fn parse_integer(text: &str) -> Result<Value, String> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    match text.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::Integer(f as i64)),
        _ => Err(format!("'{}' is not an integer", text)),
    }
}

fn parse_float(text: &str) -> Result<Value, String> {
    match text.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(Value::Missing),
        Ok(f) => Ok(Value::Float(f)),
        Err(_) => Err(format!("'{}' is not a number", text)),
    }
}

fn parse_date(text: &str) -> Result<Value, String> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(Value::Date)
        .ok_or_else(|| format!("'{}' is not a date", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens_are_missing() {
        assert_eq!(coerce("", ColumnType::Text).unwrap(), Value::Missing);
        assert_eq!(coerce("NaN", ColumnType::Float).unwrap(), Value::Missing);
        assert_eq!(coerce("  ", ColumnType::Integer).unwrap(), Value::Missing);
        for token in ["None", "#NA", "#N/A N/A", "-1.#IND", "1.#QNAN"] {
            assert_eq!(coerce(token, ColumnType::Text).unwrap(), Value::Missing, "{}", token);
        }
        assert_eq!(
            coerce("  ", ColumnType::Text).unwrap(),
            Value::Text("  ".to_string())
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce(" 12 ", ColumnType::Integer).unwrap(), Value::Integer(12));
        assert_eq!(coerce("12.0", ColumnType::Integer).unwrap(), Value::Integer(12));
        assert!(coerce("12.5", ColumnType::Integer).is_err());
        assert_eq!(coerce("2633", ColumnType::Float).unwrap(), Value::Float(2633.0));
        assert!(coerce("$4.50", ColumnType::Float).is_err());
    }

    #[test]
    fn test_dates() {
        let expected = Value::Date(NaiveDate::from_ymd_opt(2012, 1, 3).unwrap());
        assert_eq!(coerce("01/03/2012", ColumnType::Date).unwrap(), expected);
        assert_eq!(coerce("2012-01-03", ColumnType::Date).unwrap(), expected);
        assert!(coerce("03.01.2012", ColumnType::Date).is_err());
    }
}
