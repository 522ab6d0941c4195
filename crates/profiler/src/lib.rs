//! # gridwise-profiler
//!
//! Profiles a grid's structure: header presence, per-column types and
//! patterns, quality metrics and a domain tag. [`suggest`] turns the
//! resulting [`DataStructure`] into prompts, chart hints and quality notes.
//!
//! Profiles are derived on demand and never cached.

use gridwise_core::{CellValue, Grid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod detect;
pub mod domain;
pub mod suggest;

pub use domain::{classify, DomainTag};
pub use suggest::{ChartSuggestion, Suggestions};

/// Values kept per column as samples.
pub const SAMPLE_VALUES: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("No data provided for analysis")]
    EmptyGrid,
}

pub type Result<T> = std::result::Result<T, ProfileError>;

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Boolean,
    Mixed,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Mixed => "mixed",
        }
    }
}

/// Recognized shape of a text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTag {
    Email,
    Phone,
    Url,
    Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataColumn {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub samples: Vec<CellValue>,
    pub null_count: usize,
    pub unique_count: usize,
    /// Data rows the two counts above were taken over.
    pub sampled_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternTag>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Non-empty share of sampled data cells, in `[0, 1]`
    pub completeness: f64,
    pub consistency: f64,
    pub duplicate_rows: usize,
}

/// Profile of a whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStructure {
    pub has_headers: bool,
    /// Data rows, header excluded, before sampling
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<DataColumn>,
    pub data_quality: DataQuality,
    pub detected_format: DomainTag,
    pub suggested_operations: Vec<String>,
}

impl DataStructure {
    pub fn columns_of(&self, column_type: ColumnType) -> impl Iterator<Item = &DataColumn> {
        self.columns
            .iter()
            .filter(move |c| c.column_type == column_type)
    }

    pub fn count_of(&self, column_type: ColumnType) -> usize {
        self.columns_of(column_type).count()
    }
}

/// Profiling limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Data rows examined for column typing and quality
    pub sample_rows: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self { sample_rows: 1000 }
    }
}

/// Profile a grid with default options.
pub fn profile(grid: &Grid) -> Result<DataStructure> {
    profile_with(grid, &ProfileOptions::default())
}

pub fn profile_with(grid: &Grid, options: &ProfileOptions) -> Result<DataStructure> {
    if grid.is_empty() {
        return Err(ProfileError::EmptyGrid);
    }

    let rows = grid.rows();
    let has_headers = detect::detect_headers(rows);
    let data_rows = if has_headers { &rows[1..] } else { rows };
    let sampled = &data_rows[..data_rows.len().min(options.sample_rows)];
    let column_count = grid.col_count();

    let header = if has_headers { grid.header() } else { None };
    let columns: Vec<DataColumn> = (0..column_count)
        .map(|index| analyze_column(index, header, sampled))
        .collect();

    let data_quality = detect::assess_quality(sampled, column_count);
    let detected_format = domain::classify(&columns);
    let suggested_operations = suggested_operations(&columns, detected_format, &data_quality);

    tracing::debug!(
        rows = data_rows.len(),
        columns = column_count,
        has_headers,
        domain = %detected_format,
        "profiled grid"
    );

    Ok(DataStructure {
        has_headers,
        row_count: data_rows.len(),
        column_count,
        columns,
        data_quality,
        detected_format,
        suggested_operations,
    })
}

fn analyze_column(index: usize, header: Option<&[CellValue]>, rows: &[Vec<CellValue>]) -> DataColumn {
    let name = header
        .and_then(|h| h.get(index))
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Column {}", index + 1));

    let values: Vec<&CellValue> = rows
        .iter()
        .filter_map(|row| row.get(index))
        .filter(|cell| !cell.is_empty())
        .collect();

    let column_type = detect::column_type(&values);
    let pattern = if column_type == ColumnType::Text {
        detect::text_pattern(&values)
    } else {
        None
    };
    let unique_count = values
        .iter()
        .map(|v| v.as_text())
        .collect::<HashSet<_>>()
        .len();

    DataColumn {
        index,
        name,
        column_type,
        samples: values.iter().take(SAMPLE_VALUES).map(|v| (*v).clone()).collect(),
        null_count: rows.len() - values.len(),
        unique_count,
        sampled_rows: rows.len(),
        pattern,
    }
}

const MAX_OPERATIONS: usize = 6;

fn suggested_operations(columns: &[DataColumn], domain: DomainTag, quality: &DataQuality) -> Vec<String> {
    let mut ops = Vec::new();

    if quality.completeness < 0.8 {
        ops.push(String::from("Clean missing data - remove or fill empty cells"));
    }
    if quality.duplicate_rows > 0 {
        ops.push(format!("Remove {} duplicate rows", quality.duplicate_rows));
    }

    let numbers = columns.iter().filter(|c| c.column_type == ColumnType::Number).count();
    let texts = columns.iter().filter(|c| c.column_type == ColumnType::Text).count();
    if numbers > 1 {
        ops.push(String::from("Create summary statistics (sum, average, min, max)"));
        ops.push(String::from("Generate comparison charts between numeric columns"));
    }
    if texts > 0 {
        ops.push(String::from("Add filters to text columns for easy searching"));
    }

    let generic = matches!(domain, DomainTag::General | DomainTag::Other);
    if !generic || numbers > 0 {
        ops.extend(domain.playbook().operations.iter().map(|s| (*s).to_string()));
    }

    ops.push(String::from("Add conditional formatting to highlight important values"));
    ops.push(String::from("Create data validation rules"));

    ops.truncate(MAX_OPERATIONS);
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_is_error() {
        assert_eq!(profile(&Grid::default()), Err(ProfileError::EmptyGrid));
    }

    #[test]
    fn test_columns_without_headers_get_numbered_names() {
        let grid = Grid::from_data(vec![vec![1, 2], vec![3, 4]]);
        let structure = profile(&grid).unwrap();
        assert!(!structure.has_headers);
        assert_eq!(structure.row_count, 2);
        assert_eq!(structure.columns[1].name, "Column 2");
        assert_eq!(structure.detected_format, DomainTag::Other);
    }

    #[test]
    fn test_sampling_bounds_rows_examined() {
        let mut rows = vec![vec![CellValue::from("Value")]];
        rows.extend((0..50).map(|i| vec![CellValue::Int(i)]));
        rows.extend((0..50).map(|_| vec![CellValue::Null]));
        let grid = Grid::new(rows);

        let structure = profile_with(&grid, &ProfileOptions { sample_rows: 50 }).unwrap();
        assert_eq!(structure.row_count, 100);
        assert_eq!(structure.columns[0].null_count, 0);
        assert!((structure.data_quality.completeness - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_operations_capped() {
        let grid = Grid::from_data(vec![
            vec!["Product", "Price", "Qty", "Note"],
            vec!["a", "1", "2", ""],
            vec!["a", "1", "2", ""],
            vec!["b", "", "", "x"],
        ]);
        let structure = profile(&grid).unwrap();
        assert_eq!(structure.suggested_operations.len(), MAX_OPERATIONS);
        assert_eq!(
            structure.suggested_operations[0],
            "Clean missing data - remove or fill empty cells"
        );
        assert_eq!(structure.suggested_operations[1], "Remove 1 duplicate rows");
    }
}
