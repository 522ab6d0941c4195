//! # gridwise-pivot
//!
//! Pivot-style summaries of a grid whose row 0 is a header.
//!
//! Columns are named by a loose fragment: a header matches when it
//! contains the fragment or, being non-empty, is contained in it. The
//! first matching header wins. Groups keep first-seen order.

use gridwise_core::{CellValue, Grid};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from pivot operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("No data to process")]
    NoData,

    #[error("Column \"{0}\" not found")]
    ColumnNotFound(String),

    #[error("Unknown pivot operation: {0}")]
    UnknownOperation(String),
}

pub type Result<T> = std::result::Result<T, PivotError>;

/// Aggregation applied per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotOp {
    Sum,
    Count,
    Average,
}

impl PivotOp {
    /// Header of the result's value column.
    pub fn result_header(self) -> &'static str {
        match self {
            PivotOp::Sum => "Total",
            PivotOp::Count => "Count",
            PivotOp::Average => "Average",
        }
    }
}

impl fmt::Display for PivotOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PivotOp::Sum => "sum",
            PivotOp::Count => "count",
            PivotOp::Average => "average",
        };
        f.write_str(name)
    }
}

impl FromStr for PivotOp {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sum" | "total" => Ok(PivotOp::Sum),
            "count" => Ok(PivotOp::Count),
            "average" | "avg" | "mean" => Ok(PivotOp::Average),
            other => Err(PivotError::UnknownOperation(other.to_string())),
        }
    }
}

/// A pivot summary: the message plus the result grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub message: String,
    pub grid: Grid,
}

impl PivotTable {
    /// Number of groups, header excluded.
    pub fn group_count(&self) -> usize {
        self.grid.row_count().saturating_sub(1)
    }
}

/// Find the column a fragment names.
pub fn resolve_column(header: &[CellValue], fragment: &str) -> Option<usize> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    header.iter().position(|cell| {
        let name = cell.as_text().trim().to_lowercase();
        name.contains(&needle) || (!name.is_empty() && needle.contains(&name))
    })
}

fn header_of(grid: &Grid) -> Result<&[CellValue]> {
    if grid.row_count() <= 1 {
        return Err(PivotError::NoData);
    }
    grid.header().ok_or(PivotError::NoData)
}

fn require_column(header: &[CellValue], fragment: &str) -> Result<usize> {
    resolve_column(header, fragment).ok_or_else(|| PivotError::ColumnNotFound(fragment.to_string()))
}

/// Value column for `op`. Counting works without one and then counts rows.
fn value_column(header: &[CellValue], value: Option<&str>, op: PivotOp) -> Result<Option<usize>> {
    match (value, op) {
        (Some(fragment), PivotOp::Count) => Ok(resolve_column(header, fragment)),
        (Some(fragment), _) => require_column(header, fragment).map(Some),
        (None, PivotOp::Count) => Ok(None),
        (None, _) => Err(PivotError::ColumnNotFound(String::from("value"))),
    }
}

fn group_key(row: &[CellValue], col: usize) -> String {
    row.get(col)
        .map(|cell| cell.as_text().trim().to_string())
        .unwrap_or_default()
}

#[derive(Default)]
struct Bucket {
    values: Vec<f64>,
    rows: usize,
}

impl Bucket {
    fn result(&self, op: PivotOp, counting_rows: bool) -> CellValue {
        match op {
            PivotOp::Sum => CellValue::Float(self.values.iter().sum()),
            PivotOp::Count if counting_rows => CellValue::from(self.rows),
            PivotOp::Count => CellValue::from(self.values.len()),
            PivotOp::Average => {
                if self.values.is_empty() {
                    CellValue::Float(0.0)
                } else {
                    CellValue::Float(self.values.iter().sum::<f64>() / self.values.len() as f64)
                }
            }
        }
    }
}

fn collect_buckets(
    grid: &Grid,
    value_col: Option<usize>,
    key: impl Fn(&[CellValue]) -> String,
) -> IndexMap<String, Bucket> {
    let mut groups: IndexMap<String, Bucket> = IndexMap::new();
    for row in grid.data_rows() {
        let bucket = groups.entry(key(row)).or_default();
        bucket.rows += 1;
        if let Some(number) = value_col.and_then(|c| row.get(c)).and_then(CellValue::as_number) {
            bucket.values.push(number);
        }
    }
    groups
}

fn build_grid(
    first_header: String,
    op: PivotOp,
    groups: &IndexMap<String, Bucket>,
    counting_rows: bool,
) -> Grid {
    let mut rows = Vec::with_capacity(groups.len() + 1);
    rows.push(vec![
        CellValue::String(first_header),
        CellValue::from(op.result_header()),
    ]);
    for (key, bucket) in groups {
        rows.push(vec![
            CellValue::String(key.clone()),
            bucket.result(op, counting_rows),
        ]);
    }
    Grid::new(rows)
}

/// Group data rows by one column.
pub fn group_by(grid: &Grid, group: &str, value: Option<&str>, op: PivotOp) -> Result<PivotTable> {
    let header = header_of(grid)?;
    let group_col = require_column(header, group)?;
    let value_col = value_column(header, value, op)?;
    let group_name = header[group_col].as_text();

    let groups = collect_buckets(grid, value_col, |row| group_key(row, group_col));
    let message = match value_col {
        Some(col) => format!(
            "Group by {group_name} completed. Showing {op} of {} by {group_name} across {} groups",
            header[col].as_text(),
            groups.len()
        ),
        None => format!(
            "Group by {group_name} completed. Showing row count by {group_name} across {} groups",
            groups.len()
        ),
    };

    Ok(PivotTable {
        message,
        grid: build_grid(String::from("Group"), op, &groups, value_col.is_none()),
    })
}

/// Group data rows by the pair of two columns, keyed `"v1 - v2"`.
pub fn group_by_two(
    grid: &Grid,
    first: &str,
    second: &str,
    value: Option<&str>,
    op: PivotOp,
) -> Result<PivotTable> {
    let header = header_of(grid)?;
    let first_col = require_column(header, first)?;
    let second_col = require_column(header, second)?;
    let value_col = value_column(header, value, op)?;
    let first_name = header[first_col].as_text();
    let second_name = header[second_col].as_text();

    let groups = collect_buckets(grid, value_col, |row| {
        format!("{} - {}", group_key(row, first_col), group_key(row, second_col))
    });
    let message = format!(
        "Group by {first_name} and {second_name} completed. Showing {op} across {} groups",
        groups.len()
    );

    Ok(PivotTable {
        message,
        grid: build_grid(
            format!("{first_name} - {second_name}"),
            op,
            &groups,
            value_col.is_none(),
        ),
    })
}

/// Count and share of each distinct value of one column.
pub fn percentage_breakdown(grid: &Grid, group: &str) -> Result<PivotTable> {
    let header = header_of(grid)?;
    let group_col = require_column(header, group)?;
    let group_name = header[group_col].as_text();

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut total = 0usize;
    for row in grid.data_rows() {
        *counts.entry(group_key(row, group_col)).or_insert(0) += 1;
        total += 1;
    }

    let mut rows = vec![vec![
        CellValue::from("Category"),
        CellValue::from("Count"),
        CellValue::from("Percentage"),
    ]];
    for (key, count) in &counts {
        rows.push(vec![
            CellValue::String(key.clone()),
            CellValue::from(*count),
            CellValue::String(format_percentage(*count, total)),
        ]);
    }

    Ok(PivotTable {
        message: format!(
            "Percentage breakdown by {group_name} completed. Showing distribution across {} categories",
            counts.len()
        ),
        grid: Grid::new(rows),
    })
}

fn format_percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return String::from("0%");
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_column_both_directions() {
        let header = vec![
            CellValue::from("Region"),
            CellValue::from("Total Sales"),
            CellValue::Null,
        ];
        assert_eq!(resolve_column(&header, "sales"), Some(1));
        assert_eq!(resolve_column(&header, "region name"), Some(0));
        assert_eq!(resolve_column(&header, "REGION"), Some(0));
        assert_eq!(resolve_column(&header, "profit"), None);
        assert_eq!(resolve_column(&header, "  "), None);
    }

    #[test]
    fn test_op_parse() {
        assert_eq!("Average".parse::<PivotOp>(), Ok(PivotOp::Average));
        assert_eq!("total".parse::<PivotOp>(), Ok(PivotOp::Sum));
        assert!("median".parse::<PivotOp>().is_err());
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 3), "33.3%");
        assert_eq!(format_percentage(2, 3), "66.7%");
        assert_eq!(format_percentage(0, 0), "0%");
    }

    #[test]
    fn test_no_data() {
        let grid = Grid::from_data(vec![vec!["Region", "Sales"]]);
        assert_eq!(
            group_by(&grid, "region", Some("sales"), PivotOp::Sum),
            Err(PivotError::NoData)
        );
    }
}
