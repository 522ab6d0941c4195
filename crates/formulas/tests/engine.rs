use gridwise_core::{CellValue, Grid};
use gridwise_formulas::{evaluate, evaluate_display, recalculate, CompiledFormula, FormulaError};

fn column(values: Vec<CellValue>) -> Grid {
    Grid::new(values.into_iter().map(|v| vec![v]).collect())
}

#[test]
fn test_sum_treats_text_as_zero() {
    let grid = column(vec![
        CellValue::Int(1),
        CellValue::from("hello"),
        CellValue::Int(3),
    ]);
    assert_eq!(evaluate("=SUM(A1:A3)", &grid), Ok(4.0));
}

#[test]
fn test_average_excludes_text_from_denominator() {
    let grid = column(vec![
        CellValue::Int(10),
        CellValue::from("x"),
        CellValue::Int(30),
    ]);
    assert_eq!(evaluate("=AVERAGE(A1:A3)", &grid), Ok(20.0));
}

#[test]
fn test_average_of_empty_range_is_zero() {
    let grid = column(vec![CellValue::from("x"), CellValue::Null]);
    assert_eq!(evaluate("=AVERAGE(A1:A2)", &grid), Ok(0.0));
}

#[test]
fn test_min_max() {
    let grid = column(vec![
        CellValue::Int(7),
        CellValue::Float(-2.5),
        CellValue::from("12"),
    ]);
    assert_eq!(evaluate("=MIN(A1:A3)", &grid), Ok(-2.5));
    assert_eq!(evaluate("=max(A1:A3)", &grid), Ok(12.0));
    assert_eq!(evaluate("=MAX(B1:B3)", &grid), Ok(0.0));
}

#[test]
fn test_aggregate_over_rectangle() {
    let grid = Grid::from_data(vec![vec![1, 2], vec![3, 4]]);
    assert_eq!(evaluate("=SUM(A1:B2)", &grid), Ok(10.0));
    assert_eq!(evaluate("=SUM(B2:A1)/4", &grid), Ok(2.5));
}

#[test]
fn test_aggregate_range_larger_than_grid() {
    let grid = column(vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]);
    assert_eq!(evaluate("=SUM(A1:A99999999999)", &grid), Ok(6.0));
    assert_eq!(evaluate("=AVERAGE(A2:ZZZ99999999)", &grid), Ok(2.5));
    assert_eq!(evaluate("=MAX(A50:A99999999999)", &grid), Ok(0.0));
}

#[test]
fn test_aggregate_inside_arithmetic() {
    let grid = column(vec![CellValue::Int(2), CellValue::Int(4)]);
    assert_eq!(evaluate("=SUM(A1:A2)*(1+A1)", &grid), Ok(18.0));
}

#[test]
fn test_division_by_zero_reports_error() {
    let grid = column(vec![CellValue::Int(5), CellValue::Int(0)]);
    assert_eq!(
        evaluate("=A1/A2", &grid),
        Err(FormulaError::DivisionByZero)
    );
    assert_eq!(evaluate_display("=A1/A2", &grid), "#ERR");
}

#[test]
fn test_compile_invalid_formula() {
    assert!(CompiledFormula::compile("=SUM(").is_err());
    assert!(CompiledFormula::compile("=A1 +* 2").is_err());
}

#[test]
fn test_recalculate_grid() {
    let grid = Grid::from_data(vec![
        vec![CellValue::from("Qty"), CellValue::from("Total")],
        vec![CellValue::Int(3), CellValue::from("=SUM(A2:A3)")],
        vec![CellValue::Int(4), CellValue::from("=A2/B9")],
    ]);
    let out = recalculate(&grid);
    assert_eq!(out.get(1, 1), Some(&CellValue::Float(7.0)));
    assert_eq!(out.get(2, 1), Some(&CellValue::from("#ERR")));
    assert_eq!(out.get(0, 0), Some(&CellValue::from("Qty")));
}
