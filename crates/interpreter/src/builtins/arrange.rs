//! Pivot summaries, sorting and filtering. Each returns a new grid.

use super::{column_label, require_data, resolve_column, settle};
use crate::intent::{ColumnOperand, Intent, PivotRequest};
use crate::Context;
use gridwise_core::{CellValue, Grid, OperationError, OperationResult};
use gridwise_pivot::PivotError;
use std::cmp::Ordering;

pub(super) fn call_arrange_builtin(ctx: &Context<'_>, intent: &Intent) -> Option<OperationResult> {
    let result = match intent {
        Intent::PivotGroupBy(request) => pivot(ctx.grid, request),
        Intent::SortRows { column, descending } => sort_rows(ctx.grid, column, *descending),
        Intent::FilterRows { column, needle } => filter_rows(ctx.grid, column.as_ref(), needle),
        _ => return None,
    };
    Some(settle(result))
}

fn pivot_error(err: PivotError) -> OperationError {
    OperationError::operand(err.to_string())
}

fn pivot(grid: &Grid, request: &PivotRequest) -> Result<OperationResult, OperationError> {
    let table = match request {
        PivotRequest::Percentage { group } => gridwise_pivot::percentage_breakdown(grid, group),
        PivotRequest::GroupBy {
            group,
            second: Some(second),
            value,
            op,
        } => gridwise_pivot::group_by_two(grid, group, second, value.as_deref(), *op),
        PivotRequest::GroupBy {
            group,
            second: None,
            value,
            op,
        } => gridwise_pivot::group_by(grid, group, value.as_deref(), *op),
    }
    .map_err(pivot_error)?;

    Ok(OperationResult::with_grid(table.message, table.grid))
}

/// Numbers compare numerically, anything else as lower-cased text.
/// Empty cells sort last in either direction.
fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>, descending: bool) -> Ordering {
    let a = a.filter(|c| !c.is_empty());
    let b = b.filter(|c| !c.is_empty());
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.as_text().to_lowercase().cmp(&b.as_text().to_lowercase()),
    };
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

fn sort_rows(grid: &Grid, column: &ColumnOperand, descending: bool) -> Result<OperationResult, OperationError> {
    require_data(grid)?;
    let col = resolve_column(grid, column)?;

    let mut rows = grid.rows().to_vec();
    rows[1..].sort_by(|a, b| compare_cells(a.get(col), b.get(col), descending));

    let direction = if descending { "descending" } else { "ascending" };
    let message = format!(
        "Sorted {} rows by {} ({direction})",
        rows.len() - 1,
        column_label(grid, col)
    );
    Ok(OperationResult::with_grid(message, Grid::new(rows)))
}

fn filter_rows(
    grid: &Grid,
    column: Option<&ColumnOperand>,
    needle: &str,
) -> Result<OperationResult, OperationError> {
    require_data(grid)?;
    let col = column.map(|c| resolve_column(grid, c)).transpose()?;
    let needle_lower = needle.to_lowercase();
    let matches = |cell: &CellValue| cell.as_text().to_lowercase().contains(&needle_lower);

    let mut kept = vec![grid.rows()[0].clone()];
    kept.extend(
        grid.data_rows()
            .filter(|row| match col {
                Some(c) => row.get(c).is_some_and(matches),
                None => row.iter().any(matches),
            })
            .map(<[CellValue]>::to_vec),
    );

    let total = grid.row_count() - 1;
    let found = kept.len() - 1;
    let scope = col.map_or_else(String::new, |c| format!(" in {}", column_label(grid, c)));
    if found == 0 {
        return Ok(OperationResult::message(format!(
            "No rows contain \"{needle}\"{scope}"
        )));
    }

    Ok(OperationResult::with_grid(
        format!("Kept {found} of {total} rows containing \"{needle}\"{scope}"),
        Grid::new(kept),
    ))
}
