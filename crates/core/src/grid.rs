use crate::cell::CellValue;
use crate::cell_ref::CellRef;
use serde::{Deserialize, Serialize};

/// Ordered rows of cells. Row 0 is the header row when the data has one.
///
/// Rows may differ in length, so every accessor is bounds-checked per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from anything convertible to cells.
    pub fn from_data<R, T>(data: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = T>,
        T: Into<CellValue>,
    {
        Self {
            rows: data
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    #[must_use]
    pub fn get_ref(&self, cell: CellRef) -> Option<&CellValue> {
        self.get(cell.row, cell.col)
    }

    /// Numeric reading of a cell, `None` when missing or non-numeric.
    #[must_use]
    pub fn number_at(&self, cell: CellRef) -> Option<f64> {
        self.get_ref(cell).and_then(CellValue::as_number)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn header(&self) -> Option<&[CellValue]> {
        self.row(0)
    }

    /// Header texts, empty when the grid has no rows.
    #[must_use]
    pub fn header_names(&self) -> Vec<String> {
        self.header()
            .map(|h| h.iter().map(CellValue::as_text).collect())
            .unwrap_or_default()
    }

    /// Every row after row 0.
    pub fn data_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// Cells of one column below the header, skipping short rows.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> {
        self.data_rows().filter_map(move |row| row.get(col))
    }

    /// The first `limit` rows rendered as text.
    #[must_use]
    pub fn preview(&self, limit: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| row.iter().map(CellValue::as_text).collect())
            .collect()
    }

    /// New grid with `f` applied to every cell.
    #[must_use]
    pub fn map_cells(&self, mut f: impl FnMut(CellRef, &CellValue) -> CellValue) -> Grid {
        Grid {
            rows: self
                .rows
                .iter()
                .enumerate()
                .map(|(r, row)| {
                    row.iter()
                        .enumerate()
                        .map(|(c, cell)| f(CellRef::new(r, c), cell))
                        .collect()
                })
                .collect(),
        }
    }

    /// Copy limited to the first `max_rows` rows and `max_cols` columns.
    #[must_use]
    pub fn truncated(&self, max_rows: usize, max_cols: usize) -> Grid {
        Grid {
            rows: self
                .rows
                .iter()
                .take(max_rows)
                .map(|row| row.iter().take(max_cols).cloned().collect())
                .collect(),
        }
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(rows)
    }
}
