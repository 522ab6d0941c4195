//! Find/replace and duplicate removal.

use super::{require_column, settle};
use crate::intent::Intent;
use crate::Context;
use gridwise_core::{column_letters, CellValue, Grid, OperationError, OperationResult};
use regex::{NoExpand, RegexBuilder};
use std::collections::HashSet;

pub(super) fn call_cleanup_builtin(ctx: &Context<'_>, intent: &Intent) -> Option<OperationResult> {
    let result = match intent {
        Intent::FindReplace { find, replace } => find_replace(ctx.grid, find, replace),
        Intent::RemoveDuplicates { column } => remove_duplicates(ctx.grid, *column),
        _ => return None,
    };
    Some(settle(result))
}

/// Case-insensitive substring replace across every cell.
///
/// Counts cells, not occurrences. A cell whose text changes is re-typed from
/// the new text; an unchanged cell keeps its value. Replacing a term with
/// itself only counts matches, whatever their case.
fn find_replace(grid: &Grid, find: &str, replace: &str) -> Result<OperationResult, OperationError> {
    if find.is_empty() {
        return Err(OperationError::operand("Nothing to find"));
    }
    let identity = find == replace;
    let pattern = RegexBuilder::new(&regex::escape(find))
        .case_insensitive(true)
        .build()
        .map_err(|e| OperationError::operand(e.to_string()))?;

    let mut cells = 0usize;
    let updated = grid.map_cells(|_, cell| {
        if cell.is_null() {
            return cell.clone();
        }
        let text = cell.as_text();
        if !pattern.is_match(&text) {
            return cell.clone();
        }
        cells += 1;
        if identity {
            return cell.clone();
        }
        let replaced = pattern.replace_all(&text, NoExpand(replace));
        if replaced.as_ref() == text.as_str() {
            cell.clone()
        } else {
            CellValue::infer(&replaced)
        }
    });

    if cells == 0 {
        return Ok(OperationResult::message(format!("No cells contain \"{find}\"")));
    }
    Ok(OperationResult::with_grid(
        format!("Replaced \"{find}\" with \"{replace}\" in {cells} cells"),
        updated,
    ))
}

fn row_key(row: &[CellValue], width: usize) -> String {
    (0..width)
        .map(|col| row.get(col).map(CellValue::match_key).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("|")
}

/// Keep the first occurrence of each key, in order. Row 0 is always kept.
fn remove_duplicates(grid: &Grid, column: Option<usize>) -> Result<OperationResult, OperationError> {
    if let Some(col) = column {
        require_column(grid, col)?;
    }
    let width = grid.col_count();
    let Some((header, data)) = grid.rows().split_first() else {
        return Ok(OperationResult::message("No duplicate rows found"));
    };

    let mut seen = HashSet::new();
    let mut kept = vec![header.clone()];
    for row in data {
        let key = match column {
            Some(col) => row.get(col).map(CellValue::match_key).unwrap_or_default(),
            None => row_key(row, width),
        };
        if seen.insert(key) {
            kept.push(row.clone());
        }
    }

    let removed = grid.row_count() - kept.len();
    if removed == 0 {
        let scope = column.map_or_else(String::new, |col| format!(" by column {}", column_letters(col)));
        return Ok(OperationResult::message(format!("No duplicate rows found{scope}")));
    }

    let noun = if removed == 1 { "row" } else { "rows" };
    let scope = column.map_or_else(String::new, |col| format!(" (matching on column {})", column_letters(col)));
    let remaining = kept.len() - 1;
    Ok(OperationResult::with_grid(
        format!("Removed {removed} duplicate {noun} from {} rows{scope}; {remaining} remain", data.len()),
        Grid::new(kept),
    ))
}
