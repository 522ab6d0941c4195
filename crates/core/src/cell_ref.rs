use crate::error::{CoreError, OperationError, Result};
use crate::grid::Grid;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A zero-based cell position.
///
/// Ordering is row-major so overlays iterate top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse A1-style cell notation (e.g., "A1", "z99", "AA1").
    ///
    /// The whole letter run is decoded base-26; row 0 is rejected.
    pub fn parse(notation: &str) -> Result<Self> {
        let notation = notation.trim();
        let split_pos = notation
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| CoreError::InvalidCellNotation(notation.to_string()))?;

        let (col_part, row_part) = notation.split_at(split_pos);
        if col_part.is_empty() || !row_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidCellNotation(notation.to_string()));
        }

        let col = column_index(col_part)
            .map_err(|_| CoreError::InvalidCellNotation(notation.to_string()))?;
        let row = row_part
            .parse::<usize>()
            .map_err(|_| CoreError::InvalidCellNotation(notation.to_string()))?;

        if row == 0 {
            return Err(CoreError::InvalidCellNotation(notation.to_string()));
        }

        Ok(Self { row: row - 1, col })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Convert column letters to a 0-based column index.
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
pub fn column_index(letters: &str) -> Result<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(CoreError::InvalidColumn(letters.to_string()));
    }

    let mut col: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(CoreError::InvalidColumn(letters.to_string()));
        }
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(|| CoreError::InvalidColumn(letters.to_string()))?;
    }

    Ok(col - 1)
}

/// Convert a 0-based column index to letters (0 -> A, 26 -> AA).
#[must_use]
pub fn column_letters(index: usize) -> String {
    let mut result = Vec::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        result.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// A rectangular block of cells with `start <= end` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from any two corners.
    #[must_use]
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse "A1:C3"; a bare cell is a one-cell range.
    pub fn parse(notation: &str) -> Result<Self> {
        match notation.split_once(':') {
            Some((a, b)) => Ok(Self::new(CellRef::parse(a)?, CellRef::parse(b)?)),
            None => {
                let cell = CellRef::parse(notation)?;
                Ok(Self::new(cell, cell))
            }
        }
    }

    #[must_use]
    pub fn is_single_column(&self) -> bool {
        self.start.col == self.end.col
    }

    /// The column of a single-column range.
    pub fn require_single_column(&self) -> std::result::Result<usize, OperationError> {
        if self.is_single_column() {
            Ok(self.start.col)
        } else {
            Err(OperationError::operand(format!(
                "Range {self} spans more than one column; use a range within a single column"
            )))
        }
    }

    #[must_use]
    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    /// The part of this range that lies inside `grid`, or `None` when the
    /// two do not overlap.
    #[must_use]
    pub fn clamp_to(&self, grid: &Grid) -> Option<Self> {
        let (rows, cols) = (grid.row_count(), grid.col_count());
        if self.start.row >= rows || self.start.col >= cols {
            return None;
        }
        Some(Self {
            start: self.start,
            end: CellRef::new(self.end.row.min(rows - 1), self.end.col.min(cols - 1)),
        })
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellRef::new(row, col))
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
