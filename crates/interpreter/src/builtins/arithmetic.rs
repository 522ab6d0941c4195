//! Arithmetic between explicit cells.
//!
//! Every referenced cell must exist and hold a number. Results render with
//! two decimals.

use super::settle;
use crate::intent::{ArithmeticOp, CellExpression, Intent};
use crate::Context;
use gridwise_core::{CellRef, Grid, OperationError, OperationResult};
use gridwise_formulas::{CompiledFormula, FormulaError};

pub(super) fn call_arithmetic_builtin(ctx: &Context<'_>, intent: &Intent) -> Option<OperationResult> {
    let Intent::CellArithmetic(expression) = intent else {
        return None;
    };
    let result = match expression {
        CellExpression::Pair { op, left, right } => pair(ctx.grid, *op, *left, *right),
        CellExpression::ListSum(cells) => list_sum(ctx.grid, cells),
        CellExpression::Formula(source) => formula(ctx.grid, source),
    };
    Some(settle(result))
}

fn render(value: f64) -> String {
    format!("{value:.2}")
}

fn operand(grid: &Grid, cell: CellRef) -> Result<f64, OperationError> {
    let value = grid
        .get_ref(cell)
        .ok_or_else(|| OperationError::operand(format!("Cell {cell} does not exist")))?;
    if value.is_formula() {
        return Err(OperationError::operand(format!(
            "Cell {cell} holds a formula, not a number"
        )));
    }
    value
        .as_number()
        .ok_or_else(|| OperationError::operand(format!("Cell {cell} is empty or not a number")))
}

fn pair(grid: &Grid, op: ArithmeticOp, left: CellRef, right: CellRef) -> Result<OperationResult, OperationError> {
    let a = operand(grid, left)?;
    let b = operand(grid, right)?;

    let value = match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Subtract => a - b,
        ArithmeticOp::Multiply => a * b,
        ArithmeticOp::Divide => {
            if b == 0.0 {
                return Err(OperationError::DivisionByZero(format!(
                    "Cannot divide {left} by {right}: {right} is zero"
                )));
            }
            a / b
        }
    };

    Ok(OperationResult::message(format!(
        "{left} {} {right} = {}",
        op.symbol(),
        render(value)
    )))
}

fn list_sum(grid: &Grid, cells: &[CellRef]) -> Result<OperationResult, OperationError> {
    let total = cells
        .iter()
        .map(|cell| operand(grid, *cell))
        .sum::<Result<f64, _>>()?;
    let terms = cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" + ");
    Ok(OperationResult::message(format!("{terms} = {}", render(total))))
}

fn formula(grid: &Grid, source: &str) -> Result<OperationResult, OperationError> {
    let compiled =
        CompiledFormula::compile(source).map_err(|e| OperationError::FormulaSyntax(e.to_string()))?;
    for cell in &compiled.references {
        operand(grid, *cell)?;
    }

    let value = compiled.evaluate(grid).map_err(|e| match e {
        FormulaError::DivisionByZero => {
            OperationError::DivisionByZero(format!("Cannot evaluate {source}: division by zero"))
        }
        other => OperationError::FormulaSyntax(other.to_string()),
    })?;

    Ok(OperationResult::message(format!("{source} = {}", render(value))))
}
