//! Local operations, one module per family of intents.

mod aggregate;
mod arithmetic;
mod arrange;
mod cleanup;
mod style;

use crate::intent::{ColumnOperand, Intent};
use crate::Context;
use gridwise_core::{column_letters, Grid, OperationError, OperationResult};

/// Execute a recognized intent.
///
/// Every builtin returns `None` for intents it does not own.
pub(crate) fn call_builtin(ctx: &Context<'_>, intent: &Intent) -> OperationResult {
    if let Some(result) = aggregate::call_aggregate_builtin(ctx, intent) {
        return result;
    }

    if let Some(result) = arithmetic::call_arithmetic_builtin(ctx, intent) {
        return result;
    }

    if let Some(result) = style::call_style_builtin(ctx, intent) {
        return result;
    }

    if let Some(result) = cleanup::call_cleanup_builtin(ctx, intent) {
        return result;
    }

    if let Some(result) = arrange::call_arrange_builtin(ctx, intent) {
        return result;
    }

    OperationResult::failure(OperationError::Unhandled)
}

/// Column index of a letter or header-fragment operand.
fn resolve_column(grid: &Grid, column: &ColumnOperand) -> Result<usize, OperationError> {
    match column {
        ColumnOperand::Letter(index) => require_column(grid, *index),
        ColumnOperand::Name(fragment) => grid
            .header()
            .and_then(|header| gridwise_pivot::resolve_column(header, fragment))
            .ok_or_else(|| OperationError::operand(format!("Column \"{fragment}\" not found"))),
    }
}

fn require_column(grid: &Grid, index: usize) -> Result<usize, OperationError> {
    if index < grid.col_count() {
        Ok(index)
    } else {
        Err(OperationError::operand(format!(
            "Column {} not found; the sheet has {} columns",
            column_letters(index),
            grid.col_count()
        )))
    }
}

/// Header text of a column, or its letters when there is none.
fn column_label(grid: &Grid, index: usize) -> String {
    grid.get(0, index)
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| column_letters(index))
}

fn require_data(grid: &Grid) -> Result<(), OperationError> {
    if grid.row_count() <= 1 {
        Err(OperationError::operand("The sheet has no data rows"))
    } else {
        Ok(())
    }
}

/// Collapse an executor's `Result` into the returned value.
fn settle(result: Result<OperationResult, OperationError>) -> OperationResult {
    result.unwrap_or_else(OperationResult::failure)
}
