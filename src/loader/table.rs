//! Column resolution and cell conversion for CSV exports.
//!
//! Headers are normalized the same way for every table: trimmed,
//! lowercased, inner spaces replaced by `_`. A field is located by
//! trying each accepted alias in order.

use crate::utils::config::DATE_FORMATS;
use crate::utils::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

/// Normalize a header cell ("Attributed Revenue " -> "attributed_revenue")
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Normalized headers of one CSV table
#[derive(Debug, Clone)]
pub struct TableHeaders {
    file: String,
    names: Vec<String>,
}

impl TableHeaders {
    pub fn new(file: &str, raw: &StringRecord) -> Self {
        Self {
            file: file.to_string(),
            names: raw.iter().map(normalize_header).collect(),
        }
    }

    /// Index of the first alias present in the headers
    pub fn find(&self, aliases: &[&str]) -> Option<Column> {
        aliases.iter().find_map(|alias| {
            self.names
                .iter()
                .position(|name| name == alias)
                .map(|index| Column {
                    index,
                    name: self.names[index].clone(),
                })
        })
    }

    /// Like `find`, but a missing column is a `DataFormat` error
    pub fn require(&self, aliases: &[&str]) -> Result<Column, LoadError> {
        self.find(aliases)
            .ok_or_else(|| LoadError::missing_column(&self.file, aliases))
    }
}

/// A resolved column: position in the row plus its normalized name
#[derive(Debug, Clone)]
pub struct Column {
    pub index: usize,
    pub name: String,
}

/// One data row with enough context to report conversion failures
pub struct Row<'a> {
    pub file: &'a str,
    pub line: u64,
    pub record: &'a StringRecord,
}

impl<'a> Row<'a> {
    /// Raw trimmed cell text (empty when the row is short)
    pub fn text(&self, column: &Column) -> &'a str {
        self.record.get(column.index).unwrap_or("").trim()
    }

    pub fn date(&self, column: &Column) -> Result<NaiveDate, LoadError> {
        let raw = self.text(column);
        parse_date(raw).ok_or_else(|| self.parse_error(column, raw, "unrecognized date format"))
    }

    pub fn number(&self, column: &Column) -> Result<f64, LoadError> {
        let raw = self.text(column);
        if raw.is_empty() {
            return Err(self.parse_error(column, raw, "empty numeric cell"));
        }
        parse_number(raw).ok_or_else(|| self.parse_error(column, raw, "not a number"))
    }

    /// Non-negative whole number (impressions, clicks, orders)
    pub fn count(&self, column: &Column) -> Result<u64, LoadError> {
        let raw = self.text(column);
        let value = self.number(column)?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(self.parse_error(column, raw, "expected a non-negative whole number"));
        }
        // u64::MAX rounds up to 2^64 as f64, so anything at or above it cannot be cast
        if value >= u64::MAX as f64 {
            return Err(self.parse_error(column, raw, "count too large"));
        }
        Ok(value as u64)
    }

    /// Non-empty free text
    pub fn label(&self, column: &Column) -> Result<String, LoadError> {
        let raw = self.text(column);
        if raw.is_empty() {
            return Err(self.parse_error(column, raw, "empty value"));
        }
        Ok(raw.to_string())
    }

    /// Optional text column: absent column or empty cell gives `None`
    pub fn optional_label(&self, column: Option<&Column>) -> Option<String> {
        column
            .map(|c| self.text(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn optional_number(&self, column: Option<&Column>) -> Result<Option<f64>, LoadError> {
        match column {
            Some(c) if !self.text(c).is_empty() => self.number(c).map(Some),
            _ => Ok(None),
        }
    }

    pub fn optional_count(&self, column: Option<&Column>) -> Result<Option<u64>, LoadError> {
        match column {
            Some(c) if !self.text(c).is_empty() => self.count(c).map(Some),
            _ => Ok(None),
        }
    }

    fn parse_error(&self, column: &Column, value: &str, reason: &str) -> LoadError {
        LoadError::Parse {
            file: self.file.to_string(),
            column: column.name.clone(),
            line: self.line,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Parse a date cell in any of the accepted formats
///
/// Timestamps keep only their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a numeric cell, tolerating a leading `$` and thousands separators
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, raw),
    };
    let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);
    let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| if negative { -v } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Attributed Revenue "), "attributed_revenue");
        assert_eq!(normalize_header("# of Orders"), "#_of_orders");
        assert_eq!(normalize_header("\u{feff}date"), "date");
        assert_eq!(normalize_header("COGS"), "cogs");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap();
        assert_eq!(parse_date("2025-05-16"), Some(expected));
        assert_eq!(parse_date("2025/05/16"), Some(expected));
        assert_eq!(parse_date("05/16/2025"), Some(expected));
        assert_eq!(parse_date("5/16/2025"), Some(expected));
        assert_eq!(parse_date("2025-05-16T08:30:00Z"), Some(expected));
        assert_eq!(parse_date("2025-05-16 23:59:59"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("100"), Some(100.0));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number("-$20"), Some(-20.0));
        assert_eq!(parse_number("-7.5"), Some(-7.5));
        assert_eq!(parse_number("--5"), None);
        assert_eq!(parse_number("12%"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_require_missing_column() {
        let raw = StringRecord::from(vec!["date", "spend"]);
        let headers = TableHeaders::new("Facebook.csv", &raw);

        assert!(headers.require(&["spend"]).is_ok());
        let err = headers.require(&["clicks"]).unwrap_err();
        assert!(matches!(err, LoadError::DataFormat { .. }));
        assert!(err.to_string().contains("clicks"));
    }

    #[test]
    fn test_find_prefers_first_alias() {
        let raw = StringRecord::from(vec!["impression", "Impressions"]);
        let headers = TableHeaders::new("t.csv", &raw);
        let column = headers.find(&["impressions", "impression"]).unwrap();
        assert_eq!(column.index, 1);
    }

    #[test]
    fn test_row_count_rejects_fractions() {
        let raw = StringRecord::from(vec!["clicks"]);
        let headers = TableHeaders::new("t.csv", &raw);
        let column = headers.require(&["clicks"]).unwrap();

        let record = StringRecord::from(vec!["2.5"]);
        let row = Row { file: "t.csv", line: 2, record: &record };
        let err = row.count(&column).unwrap_err();

        match err {
            LoadError::Parse { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "clicks");
                assert_eq!(value, "2.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_count_rejects_values_beyond_u64() {
        let raw = StringRecord::from(vec!["impressions"]);
        let headers = TableHeaders::new("t.csv", &raw);
        let column = headers.require(&["impressions"]).unwrap();

        let huge = StringRecord::from(vec!["1e20"]);
        let row = Row { file: "t.csv", line: 2, record: &huge };
        assert!(matches!(row.count(&column), Err(LoadError::Parse { .. })));

        let large = StringRecord::from(vec!["1e19"]);
        let row = Row { file: "t.csv", line: 3, record: &large };
        assert_eq!(row.count(&column).unwrap(), 10_000_000_000_000_000_000);
    }
}
