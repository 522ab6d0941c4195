//! Header detection, value classification and quality metrics.

use crate::{ColumnType, DataQuality, PatternTag};
use chrono::NaiveDate;
use gridwise_core::CellValue;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Date shapes; each must also parse as a calendar date
    static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref US_SLASH_DATE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
    static ref US_DASH_DATE: Regex = Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap();
    static ref SHORT_SLASH_DATE: Regex = Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").unwrap();

    // Text patterns
    static ref PHONE: Regex = Regex::new(r"^\+?[\d\s\-()]{10,}$").unwrap();
    static ref URL: Regex = Regex::new(r"^https?://").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"(?i)^[A-Z0-9\-_]{3,}$").unwrap();
}

const BOOLEAN_WORDS: [&str; 8] = ["true", "false", "yes", "no", "1", "0", "y", "n"];

/// Share of row 0 that must be non-numeric text for it to be a header.
const HEADER_TEXT_SHARE: f64 = 0.6;
/// Share of values a column type needs to win the vote.
const TYPE_MAJORITY: f64 = 0.8;
/// Numeric share above which a column without a majority is `mixed`.
const MIXED_NUMERIC_SHARE: f64 = 0.3;
/// Samples inspected for text pattern tags.
const PATTERN_SAMPLES: usize = 10;

/// Row 0 is a header when most of it is non-numeric text and row 1 has a number.
pub fn detect_headers(rows: &[Vec<CellValue>]) -> bool {
    let (Some(first), Some(second)) = (rows.first(), rows.get(1)) else {
        return false;
    };
    if first.is_empty() {
        return false;
    }

    let text_in_first = first
        .iter()
        .filter(|cell| matches!(cell, CellValue::String(_)) && !cell.is_empty() && !cell.is_numeric())
        .count();
    let numbers_in_second = second.iter().filter(|cell| cell.is_numeric()).count();

    text_in_first as f64 > first.len() as f64 * HEADER_TEXT_SHARE && numbers_in_second > 0
}

/// Date-shaped text that is also a real calendar date.
pub fn is_date(value: &CellValue) -> bool {
    let CellValue::String(text) = value else {
        return false;
    };
    let text = text.trim();

    if ISO_DATE.is_match(text) {
        return NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();
    }
    if US_SLASH_DATE.is_match(text) {
        return NaiveDate::parse_from_str(text, "%m/%d/%Y").is_ok();
    }
    if US_DASH_DATE.is_match(text) {
        return NaiveDate::parse_from_str(text, "%m-%d-%Y").is_ok();
    }
    if SHORT_SLASH_DATE.is_match(text) {
        let year_digits = text.rsplit('/').next().map_or(0, str::len);
        let format = if year_digits == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(text, format).is_ok();
    }
    false
}

pub fn is_boolean(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(_) => true,
        CellValue::String(s) => BOOLEAN_WORDS.contains(&s.trim().to_lowercase().as_str()),
        _ => false,
    }
}

/// Majority vote over the non-empty values of one column.
///
/// Numbers are tested first, so "1" and "0" count as numbers.
pub fn column_type(values: &[&CellValue]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::Text;
    }

    let (mut numbers, mut dates, mut booleans) = (0usize, 0usize, 0usize);
    for value in values {
        if value.is_numeric() {
            numbers += 1;
        } else if is_date(value) {
            dates += 1;
        } else if is_boolean(value) {
            booleans += 1;
        }
    }

    let total = values.len() as f64;
    let share = |count: usize| count as f64 / total;

    if share(numbers) >= TYPE_MAJORITY {
        ColumnType::Number
    } else if share(dates) >= TYPE_MAJORITY {
        ColumnType::Date
    } else if share(booleans) >= TYPE_MAJORITY {
        ColumnType::Boolean
    } else if numbers > 0 && share(numbers) > MIXED_NUMERIC_SHARE {
        ColumnType::Mixed
    } else {
        ColumnType::Text
    }
}

/// Pattern tag of a text column, judged on its first few values.
pub fn text_pattern(values: &[&CellValue]) -> Option<PatternTag> {
    let samples: Vec<String> = values
        .iter()
        .take(PATTERN_SAMPLES)
        .map(|v| v.as_text().trim().to_string())
        .collect();
    if samples.is_empty() {
        return None;
    }

    if samples.iter().any(|s| s.contains('@')) {
        Some(PatternTag::Email)
    } else if samples.iter().any(|s| PHONE.is_match(s)) {
        Some(PatternTag::Phone)
    } else if samples.iter().any(|s| URL.is_match(s)) {
        Some(PatternTag::Url)
    } else if samples.iter().all(|s| IDENTIFIER.is_match(s)) {
        Some(PatternTag::Id)
    } else {
        None
    }
}

/// Completeness, consistency and duplicates over the sampled data rows.
///
/// Cells missing from short rows count as empty.
pub fn assess_quality(rows: &[Vec<CellValue>], column_count: usize) -> DataQuality {
    let total_cells = rows.len() * column_count;
    if total_cells == 0 {
        return DataQuality::default();
    }

    let filled = rows
        .iter()
        .map(|row| row.iter().take(column_count).filter(|c| !c.is_empty()).count())
        .sum::<usize>();
    let completeness = filled as f64 / total_cells as f64;

    let mut seen = HashSet::new();
    let duplicate_rows = rows
        .iter()
        .filter(|row| !seen.insert(serde_json::to_string(row).unwrap_or_default()))
        .count();

    let consistency = if completeness > 0.8 {
        0.9
    } else {
        completeness * 0.7
    };

    DataQuality {
        completeness,
        consistency,
        duplicate_rows,
    }
}
