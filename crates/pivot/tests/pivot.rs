use gridwise_core::{CellValue, Grid};
use gridwise_pivot::{group_by, group_by_two, percentage_breakdown, PivotError, PivotOp};

fn sales() -> Grid {
    Grid::from_data(vec![
        vec![
            CellValue::from("Region"),
            CellValue::from("Month"),
            CellValue::from("Sales"),
        ],
        vec!["West".into(), "Jan".into(), CellValue::Int(100)],
        vec!["East".into(), "Jan".into(), CellValue::Int(50)],
        vec![" West ".into(), "Feb".into(), CellValue::Int(25)],
        vec!["North".into(), "Feb".into(), CellValue::from("n/a")],
        vec!["East".into(), "Jan".into(), CellValue::Float(10.5)],
    ])
}

fn column(grid: &Grid, col: usize) -> Vec<CellValue> {
    grid.rows()
        .iter()
        .map(|row| row.get(col).cloned().unwrap_or_default())
        .collect()
}

#[test]
fn test_group_by_sum_keeps_first_seen_order() {
    let table = group_by(&sales(), "region", Some("sales"), PivotOp::Sum).unwrap();
    assert_eq!(
        column(&table.grid, 0),
        vec![
            CellValue::from("Group"),
            CellValue::from("West"),
            CellValue::from("East"),
            CellValue::from("North"),
        ]
    );
    assert_eq!(
        column(&table.grid, 1),
        vec![
            CellValue::from("Total"),
            CellValue::Float(125.0),
            CellValue::Float(60.5),
            CellValue::Float(0.0),
        ]
    );
    assert_eq!(table.group_count(), 3);
}

#[test]
fn test_group_by_average_skips_non_numeric() {
    let table = group_by(&sales(), "region", Some("sales"), PivotOp::Average).unwrap();
    assert_eq!(table.grid.get(0, 1), Some(&CellValue::from("Average")));
    assert_eq!(table.grid.get(1, 1), Some(&CellValue::Float(62.5)));
    assert_eq!(table.grid.get(3, 1), Some(&CellValue::Float(0.0)));
}

#[test]
fn test_group_by_count_without_value_counts_rows() {
    let table = group_by(&sales(), "month", None, PivotOp::Count).unwrap();
    assert_eq!(table.grid.get(1, 0), Some(&CellValue::from("Jan")));
    assert_eq!(table.grid.get(1, 1), Some(&CellValue::Int(3)));
    assert_eq!(table.grid.get(2, 1), Some(&CellValue::Int(2)));
    assert!(table.message.contains("row count"));
}

#[test]
fn test_group_by_count_of_values_skips_text() {
    let table = group_by(&sales(), "region", Some("sales"), PivotOp::Count).unwrap();
    assert_eq!(table.grid.get(3, 1), Some(&CellValue::Int(0)));
}

#[test]
fn test_group_by_two_keys() {
    let table = group_by_two(&sales(), "region", "month", Some("sales"), PivotOp::Sum).unwrap();
    assert_eq!(table.grid.get(0, 0), Some(&CellValue::from("Region - Month")));
    assert_eq!(table.grid.get(1, 0), Some(&CellValue::from("West - Jan")));
    assert_eq!(table.grid.get(2, 0), Some(&CellValue::from("East - Jan")));
    assert_eq!(table.grid.get(2, 1), Some(&CellValue::Float(60.5)));
    assert_eq!(table.group_count(), 4);
}

#[test]
fn test_percentage_breakdown() {
    let grid = Grid::from_data(vec![
        vec!["Status"],
        vec!["Open"],
        vec!["Closed"],
        vec!["Open"],
    ]);
    let table = percentage_breakdown(&grid, "status").unwrap();
    assert_eq!(
        table.grid.row(0).unwrap(),
        &[
            CellValue::from("Category"),
            CellValue::from("Count"),
            CellValue::from("Percentage"),
        ]
    );
    assert_eq!(
        table.grid.row(1).unwrap(),
        &[CellValue::from("Open"), CellValue::Int(2), CellValue::from("66.7%")]
    );
    assert_eq!(
        table.grid.row(2).unwrap(),
        &[CellValue::from("Closed"), CellValue::Int(1), CellValue::from("33.3%")]
    );
}

#[test]
fn test_missing_column() {
    assert_eq!(
        group_by(&sales(), "country", Some("sales"), PivotOp::Sum),
        Err(PivotError::ColumnNotFound("country".to_string()))
    );
    assert_eq!(
        group_by(&sales(), "region", Some("profit"), PivotOp::Average),
        Err(PivotError::ColumnNotFound("profit".to_string()))
    );
}

#[test]
fn test_input_not_mutated() {
    let grid = sales();
    let before = grid.clone();
    let _ = percentage_breakdown(&grid, "region");
    assert_eq!(grid, before);
}
