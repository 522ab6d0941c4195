//! Shared helpers for interpreter tests.

#![allow(dead_code)]

use gridwise_core::{CellValue, FormatOverlay, Grid, OperationResult};
use gridwise_interpreter::Interpreter;

/// Run one instruction against `grid` with an empty overlay.
pub fn run(grid: &Grid, prompt: &str) -> OperationResult {
    Interpreter::new().execute(grid, &FormatOverlay::new(), prompt)
}

/// Build a grid from string cells, inferring types the way an importer would.
pub fn sheet(rows: &[&[&str]]) -> Grid {
    Grid::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| CellValue::infer(cell)).collect())
            .collect(),
    )
}

/// Header plus `n` data rows of (name, value).
pub fn numbered(n: usize) -> Grid {
    let mut rows = vec![vec![CellValue::from("Name"), CellValue::from("Value")]];
    rows.extend((1..=n).map(|i| vec![CellValue::from(format!("row{i}")), CellValue::from(i)]));
    Grid::new(rows)
}

/// Text of every cell in column `col`, header included.
pub fn column_text(grid: &Grid, col: usize) -> Vec<String> {
    grid.rows()
        .iter()
        .map(|row| row.get(col).map(CellValue::as_text).unwrap_or_default())
        .collect()
}
