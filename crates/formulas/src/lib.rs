//! # gridwise-formulas
//!
//! Closed-grammar formula parsing and evaluation against a [`Grid`].
//!
//! Supports numbers, cell references, `+ - * /`, unary sign, parentheses
//! and the range aggregates `SUM`, `AVERAGE`, `MIN` and `MAX`. Nothing is
//! ever executed dynamically; anything outside the grammar is a parse error.

use gridwise_core::{format_number, CellRange, CellRef, CellValue, Grid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub mod parser;

pub use parser::parse_formula;

/// Display text for any formula that fails to parse or evaluate.
pub const ERROR_SENTINEL: &str = "#ERR";

/// Formula expression AST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),
    /// Cell reference
    CellRef(CellRef),
    /// Range aggregate such as `SUM(A1:A3)`
    Aggregate { func: AggregateFn, range: CellRange },
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        expr: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Negate,
}

/// Range functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFn {
    Sum,
    Average,
    Min,
    Max,
}

impl AggregateFn {
    /// Case-insensitive lookup by function name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(Self::Sum),
            "AVERAGE" => Some(Self::Average),
            "MIN" => Some(Self::Min),
            "MAX" => Some(Self::Max),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Result is not a finite number")]
    NotFinite,
}

/// Parsed formula with the cells it reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledFormula {
    /// The original formula text
    pub source: String,
    pub ast: FormulaExpr,
    /// Single-cell references in row-major order, ranges excluded
    pub references: Vec<CellRef>,
}

impl CompiledFormula {
    pub fn compile(source: &str) -> Result<Self, FormulaError> {
        let ast = parse_formula(source)?;
        let mut refs = BTreeSet::new();
        collect_references(&ast, &mut refs);
        Ok(Self {
            source: source.to_string(),
            ast,
            references: refs.into_iter().collect(),
        })
    }

    pub fn evaluate(&self, grid: &Grid) -> Result<f64, FormulaError> {
        evaluate_expr(&self.ast, grid)
    }
}

fn collect_references(expr: &FormulaExpr, refs: &mut BTreeSet<CellRef>) {
    match expr {
        FormulaExpr::CellRef(cell) => {
            refs.insert(*cell);
        }
        FormulaExpr::BinaryOp { left, right, .. } => {
            collect_references(left, refs);
            collect_references(right, refs);
        }
        FormulaExpr::UnaryOp { expr, .. } => collect_references(expr, refs),
        FormulaExpr::Number(_) | FormulaExpr::Aggregate { .. } => {}
    }
}

/// Parse and evaluate `formula` against `grid`.
pub fn evaluate(formula: &str, grid: &Grid) -> Result<f64, FormulaError> {
    let expr = parse_formula(formula)?;
    evaluate_expr(&expr, grid)
}

/// Evaluate and render for display; any failure renders as `#ERR`.
pub fn evaluate_display(formula: &str, grid: &Grid) -> String {
    match evaluate(formula, grid) {
        Ok(value) => format_number(value),
        Err(err) => {
            tracing::debug!(formula, error = %err, "formula evaluation failed");
            ERROR_SENTINEL.to_string()
        }
    }
}

/// Evaluate a parsed expression.
pub fn evaluate_expr(expr: &FormulaExpr, grid: &Grid) -> Result<f64, FormulaError> {
    let value = match expr {
        FormulaExpr::Number(n) => *n,
        FormulaExpr::CellRef(cell) => cell_number(grid, *cell).unwrap_or(0.0),
        FormulaExpr::Aggregate { func, range } => aggregate(*func, range, grid),
        FormulaExpr::UnaryOp {
            op: UnaryOperator::Negate,
            expr,
        } => -evaluate_expr(expr, grid)?,
        FormulaExpr::BinaryOp { op, left, right } => {
            let l = evaluate_expr(left, grid)?;
            let r = evaluate_expr(right, grid)?;
            match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => {
                    if r == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    l / r
                }
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NotFinite)
    }
}

/// Numeric value of a referenced cell. Formula sources are not followed.
fn cell_number(grid: &Grid, cell: CellRef) -> Option<f64> {
    grid.get_ref(cell)
        .filter(|v| !v.is_formula())
        .and_then(CellValue::as_number)
}

fn aggregate(func: AggregateFn, range: &CellRange, grid: &Grid) -> f64 {
    let values: Vec<f64> = range
        .clamp_to(grid)
        .iter()
        .flat_map(CellRange::cells)
        .filter_map(|cell| cell_number(grid, cell))
        .collect();

    match func {
        // Non-numeric cells add nothing
        AggregateFn::Sum => values.iter().sum(),
        AggregateFn::Average => {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
        AggregateFn::Min => values.iter().copied().reduce(f64::min).unwrap_or(0.0),
        AggregateFn::Max => values.iter().copied().reduce(f64::max).unwrap_or(0.0),
    }
}

/// Copy of `grid` with every formula cell replaced by its value.
///
/// References read the raw grid, so a formula that points at another
/// formula sees a non-numeric cell.
pub fn recalculate(grid: &Grid) -> Grid {
    grid.map_cells(|_, cell| match cell {
        CellValue::String(source) if cell.is_formula() => match evaluate(source, grid) {
            Ok(value) => CellValue::Float(value),
            Err(_) => CellValue::from(ERROR_SENTINEL),
        },
        other => other.clone(),
    })
}
