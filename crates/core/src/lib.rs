//! # gridwise-core
//!
//! Value types shared by every gridwise crate.
//!
//! This crate provides:
//! - [`CellValue`] and [`Grid`], the immutable tabular input
//! - [`CellRef`] / [`CellRange`], the single A1 notation resolver
//! - [`FormatOverlay`], the sparse per-cell style map
//! - [`OperationResult`] and the error kinds returned as data
//!
//! # Examples
//!
//! ```
//! use gridwise_core::{CellRef, Grid};
//!
//! let grid = Grid::from_data(vec![
//!     vec!["Name", "Score"],
//!     vec!["Alice", "10"],
//! ]);
//!
//! let cell = CellRef::parse("B2").unwrap();
//! assert_eq!(grid.number_at(cell), Some(10.0));
//! assert_eq!(cell.to_string(), "B2");
//! ```

/// Scalar cell values.
pub mod cell;
/// A1 notation parsing and formatting.
pub mod cell_ref;
/// Error types and result aliases.
pub mod error;
/// Format overlay and view state.
pub mod format;
/// The grid value object.
pub mod grid;
/// Operation results.
pub mod result;

/// Re-export cell value helpers.
pub use cell::{format_number, CellValue};
/// Re-export cell reference types.
pub use cell_ref::{column_index, column_letters, CellRange, CellRef};
/// Re-export error types.
pub use error::{CoreError, OperationError, Result};
/// Re-export formatting types.
pub use format::{Alignment, CellFormat, FormatOverlay, FreezePanes, HighlightColor};
/// Re-export the grid type.
pub use grid::Grid;
/// Re-export the operation result type.
pub use result::{OperationResult, PREVIEW_ROWS};

/// Longest instruction accepted by the command interpreter, in characters.
pub const MAX_PROMPT_CHARS: usize = 500;
