//! Column and range aggregates plus column statistics.

use super::{column_label, require_column, resolve_column, settle};
use crate::intent::{AggregateOp, ColumnOperand, Intent};
use crate::Context;
use gridwise_core::{column_letters, format_number, CellRange, CellValue, Grid, OperationError, OperationResult};

pub(super) fn call_aggregate_builtin(ctx: &Context<'_>, intent: &Intent) -> Option<OperationResult> {
    let result = match intent {
        Intent::ColumnAggregate { column } => column_aggregate(ctx.grid, AggregateOp::Sum, *column),
        Intent::ColumnWholeAggregate { op, column } => column_aggregate(ctx.grid, *op, *column),
        Intent::RangeAggregate { op, range } => range_aggregate(ctx.grid, *op, range),
        Intent::ColumnStatistics { column } => statistics(ctx.grid, column),
        _ => return None,
    };
    Some(settle(result))
}

/// Numeric values and non-empty count of a set of cells.
struct Tally {
    numbers: Vec<f64>,
    filled: usize,
}

impl Tally {
    fn of<'a>(cells: impl Iterator<Item = &'a CellValue>) -> Self {
        let mut tally = Tally {
            numbers: Vec::new(),
            filled: 0,
        };
        for cell in cells {
            if cell.is_empty() {
                continue;
            }
            tally.filled += 1;
            if let Some(n) = cell.as_number() {
                tally.numbers.push(n);
            }
        }
        tally
    }

    fn sum(&self) -> f64 {
        self.numbers.iter().sum()
    }

    /// `None` when `op` needs at least one number and there is none.
    fn apply(&self, op: AggregateOp) -> Option<f64> {
        let numbers = &self.numbers;
        match op {
            AggregateOp::Sum => Some(self.sum()),
            AggregateOp::Count => Some(numbers.len() as f64),
            AggregateOp::CountA => Some(self.filled as f64),
            AggregateOp::Average if numbers.is_empty() => None,
            AggregateOp::Average => Some(self.sum() / numbers.len() as f64),
            AggregateOp::Max => numbers.iter().copied().reduce(f64::max),
            AggregateOp::Min => numbers.iter().copied().reduce(f64::min),
        }
    }

    fn median(&self) -> Option<f64> {
        let mut sorted = self.numbers.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        match sorted.len() {
            0 => None,
            n if n % 2 == 0 => Some((sorted[mid - 1] + sorted[mid]) / 2.0),
            _ => Some(sorted[mid]),
        }
    }
}

fn describe(op: AggregateOp, subject: &str, value: f64, tally: &Tally) -> String {
    let base = format!("{} of {subject} = {}", op.label(), format_number(value));
    match op {
        AggregateOp::Count | AggregateOp::CountA => base,
        _ => format!("{base} across {} numeric cells", tally.numbers.len()),
    }
}

fn column_aggregate(grid: &Grid, op: AggregateOp, column: usize) -> Result<OperationResult, OperationError> {
    let column = require_column(grid, column)?;
    let letters = column_letters(column);
    let label = column_label(grid, column);
    let subject = if label == letters {
        format!("column {letters}")
    } else {
        format!("column {letters} ({label})")
    };

    let tally = Tally::of(grid.column_values(column));
    let value = tally
        .apply(op)
        .ok_or_else(|| OperationError::operand(format!("Column {letters} has no numeric values")))?;

    Ok(OperationResult::message(describe(op, &subject, value, &tally)))
}

fn range_aggregate(grid: &Grid, op: AggregateOp, range: &CellRange) -> Result<OperationResult, OperationError> {
    range.require_single_column()?;
    let Some(within) = range.clamp_to(grid) else {
        return Err(OperationError::operand(format!(
            "Range {range} is outside the sheet, which has {} rows",
            grid.row_count()
        )));
    };

    let tally = Tally::of(within.cells().filter_map(|cell| grid.get_ref(cell)));
    let value = tally
        .apply(op)
        .ok_or_else(|| OperationError::operand(format!("Range {range} has no numeric values")))?;

    Ok(OperationResult::message(describe(op, &range.to_string(), value, &tally)))
}

fn statistics(grid: &Grid, column: &ColumnOperand) -> Result<OperationResult, OperationError> {
    let column = resolve_column(grid, column)?;
    let label = column_label(grid, column);
    let tally = Tally::of(grid.column_values(column));

    let (Some(average), Some(min), Some(max), Some(median)) = (
        tally.apply(AggregateOp::Average),
        tally.apply(AggregateOp::Min),
        tally.apply(AggregateOp::Max),
        tally.median(),
    ) else {
        return Err(OperationError::operand(format!("Column {label} has no numeric values")));
    };

    Ok(OperationResult::message(format!(
        "Statistics for {label}: count {}, sum {}, average {}, min {}, max {}, median {}",
        tally.numbers.len(),
        format_number(tally.sum()),
        format_number(average),
        format_number(min),
        format_number(max),
        format_number(median)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_skips_text() {
        let cells = [
            CellValue::Int(4),
            CellValue::from("n/a"),
            CellValue::Null,
            CellValue::from("6"),
        ];
        let tally = Tally::of(cells.iter());
        assert_eq!(tally.apply(AggregateOp::Sum), Some(10.0));
        assert_eq!(tally.apply(AggregateOp::Count), Some(2.0));
        assert_eq!(tally.apply(AggregateOp::CountA), Some(3.0));
        assert_eq!(tally.apply(AggregateOp::Average), Some(5.0));
        assert_eq!(tally.median(), Some(5.0));
    }

    #[test]
    fn test_empty_tally() {
        let tally = Tally::of(std::iter::empty());
        assert_eq!(tally.apply(AggregateOp::Sum), Some(0.0));
        assert_eq!(tally.apply(AggregateOp::Max), None);
        assert_eq!(tally.median(), None);
    }
}
