//! Formatting, highlighting and frozen panes. None of these touch the grid.

use super::{require_column, require_data, settle};
use crate::intent::{ColumnSelector, FreezeTarget, HighlightRequest, Intent, RowSelector, TextStyle};
use crate::Context;
use gridwise_core::{
    column_letters, CellFormat, CellRange, CellRef, FormatOverlay, FreezePanes, Grid, OperationError,
    OperationResult,
};

pub(super) fn call_style_builtin(ctx: &Context<'_>, intent: &Intent) -> Option<OperationResult> {
    let result = match intent {
        Intent::Formatting { style, target } => format_cells(ctx, *style, target.as_ref()),
        Intent::Highlighting(request) => highlight(ctx, request),
        Intent::FreezePanes(target) => Ok(freeze(ctx.freeze, *target)),
        _ => return None,
    };
    Some(settle(result))
}

fn style_format(style: TextStyle) -> CellFormat {
    match style {
        TextStyle::Bold => CellFormat::bold(),
        TextStyle::Italic => CellFormat::italic(),
        TextStyle::Align(alignment) => CellFormat::aligned(alignment),
        TextStyle::Color(color) => CellFormat::text_color(color.text()),
    }
}

/// Every cell of every data row, out to the widest row.
fn data_cells(grid: &Grid) -> impl Iterator<Item = CellRef> {
    let cols = grid.col_count();
    (1..grid.row_count()).flat_map(move |row| (0..cols).map(move |col| CellRef::new(row, col)))
}

fn format_cells(
    ctx: &Context<'_>,
    style: TextStyle,
    target: Option<&CellRange>,
) -> Result<OperationResult, OperationError> {
    let format = style_format(style);
    let mut overlay = FormatOverlay::new();

    let message = match target {
        Some(range) => {
            let within = range.clamp_to(ctx.grid).ok_or_else(|| {
                OperationError::operand(format!(
                    "Range {range} is outside the sheet, which has {} rows and {} columns",
                    ctx.grid.row_count(),
                    ctx.grid.col_count()
                ))
            })?;
            for cell in within.cells() {
                overlay.apply(cell, &format);
            }
            format!("Applied {style} to {within}")
        }
        None => {
            for cell in data_cells(ctx.grid) {
                overlay.apply(cell, &format);
            }
            let rows = ctx.grid.row_count().saturating_sub(1);
            format!("Applied {style} to all {rows} data rows; no cell range was given, so the header row was left unchanged")
        }
    };

    Ok(OperationResult::with_overlay(message, ctx.overlay.merged(&overlay)))
}

/// Grid row indices picked by a selector, header excluded.
fn selected_rows(grid: &Grid, selector: RowSelector) -> Result<Vec<usize>, OperationError> {
    let last = grid.row_count().saturating_sub(1);
    let rows: Vec<usize> = match selector {
        RowSelector::All => (1..=last).collect(),
        RowSelector::Top(n) => (1..=n.min(last)).collect(),
        RowSelector::Bottom(n) => (last.saturating_sub(n) + 1..=last).collect(),
        RowSelector::Odd => (1..=last).step_by(2).collect(),
        RowSelector::Even => (2..=last).step_by(2).collect(),
        RowSelector::Row(n) => (n..=n).filter(|r| (1..=last).contains(r)).collect(),
        RowSelector::Rows(a, b) => (a.max(1)..=b.min(last)).collect(),
    };

    if rows.is_empty() {
        return Err(OperationError::operand(format!(
            "No data rows match; the sheet has {last} data rows"
        )));
    }
    Ok(rows)
}

fn selected_columns(grid: &Grid, selector: ColumnSelector) -> Result<Vec<usize>, OperationError> {
    match selector {
        ColumnSelector::All => Ok((0..grid.col_count()).collect()),
        ColumnSelector::Column(c) => Ok(vec![require_column(grid, c)?]),
        ColumnSelector::Columns(a, b) => {
            require_column(grid, a)?;
            let b = b.min(grid.col_count() - 1);
            Ok((a..=b).collect())
        }
    }
}

fn describe_rows(selector: RowSelector, count: usize) -> String {
    match selector {
        RowSelector::All => format!("all {count} data rows"),
        RowSelector::Top(_) => format!("the top {count} rows"),
        RowSelector::Bottom(_) => format!("the bottom {count} rows"),
        RowSelector::Odd => format!("{count} odd rows"),
        RowSelector::Even => format!("{count} even rows"),
        RowSelector::Row(n) => format!("row {n}"),
        RowSelector::Rows(a, b) => format!("rows {a}-{b}"),
    }
}

fn describe_columns(selector: ColumnSelector) -> String {
    match selector {
        ColumnSelector::All => String::new(),
        ColumnSelector::Column(c) => format!(" in column {}", column_letters(c)),
        ColumnSelector::Columns(a, b) => {
            format!(" in columns {}-{}", column_letters(a), column_letters(b))
        }
    }
}

fn highlight(ctx: &Context<'_>, request: &HighlightRequest) -> Result<OperationResult, OperationError> {
    let grid = ctx.grid;
    require_data(grid)?;
    let rows = selected_rows(grid, request.rows)?;
    let columns = selected_columns(grid, request.columns)?;

    let format = CellFormat::highlight(request.color);
    let mut overlay = FormatOverlay::new();
    for row in &rows {
        for col in &columns {
            overlay.apply(CellRef::new(*row, *col), &format);
        }
    }

    let message = format!(
        "Highlighted {}{} in {}",
        describe_rows(request.rows, rows.len()),
        describe_columns(request.columns),
        request.color.name()
    );
    Ok(OperationResult::with_overlay(message, ctx.overlay.merged(&overlay)))
}

fn freeze(current: FreezePanes, target: FreezeTarget) -> OperationResult {
    let (panes, message) = match target {
        FreezeTarget::FirstRow => (
            FreezePanes {
                rows: true,
                columns: current.columns,
            },
            "Froze the first row",
        ),
        FreezeTarget::FirstColumn => (
            FreezePanes {
                rows: current.rows,
                columns: true,
            },
            "Froze the first column",
        ),
        FreezeTarget::Both => (
            FreezePanes {
                rows: true,
                columns: true,
            },
            "Froze the first row and the first column",
        ),
        FreezeTarget::Unfreeze => (FreezePanes::default(), "Unfroze all panes"),
    };
    OperationResult::with_freeze(message, panes)
}
