use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridwise_core::{CellValue, FormatOverlay, Grid};
use gridwise_interpreter::{CommandParser, Interpreter};

/// Header plus `rows` data rows of region, product, quantity and price.
fn sales_grid(rows: usize) -> Grid {
    let regions = ["West", "East", "North", "South"];
    let mut data = vec![vec![
        CellValue::from("Region"),
        CellValue::from("Product"),
        CellValue::from("Qty"),
        CellValue::from("Price"),
    ]];
    for i in 0..rows {
        data.push(vec![
            CellValue::from(regions[i % regions.len()]),
            CellValue::from(format!("item{}", i % 50)),
            CellValue::Int((i % 17) as i64),
            CellValue::Float((i as f64) * 1.5),
        ]);
    }
    Grid::new(data)
}

fn bench_parse_instructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, prompt) in [
        ("arithmetic", "A1/B1"),
        ("column_sum", "sum of column C"),
        ("range", "average of D2 through D100"),
        ("pivot", "sum of qty by region and product"),
        ("highlight", "highlight top 5 rows in column B green"),
        ("unhandled", "forecast next quarter revenue by region"),
    ] {
        group.bench_function(name, |b| b.iter(|| CommandParser::parse(black_box(prompt))));
    }

    group.finish();
}

fn bench_execute_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    let interpreter = Interpreter::new();
    let overlay = FormatOverlay::new();

    for size in [100, 1000, 10000].iter() {
        let grid = sales_grid(*size);

        for prompt in [
            "sum of column C",
            "remove duplicates",
            "sum of qty by region",
            "sort by price descending",
            "replace West with Pacific",
        ] {
            group.bench_with_input(BenchmarkId::new(prompt, size), size, |b, _| {
                b.iter(|| interpreter.execute(black_box(&grid), &overlay, black_box(prompt)))
            });
        }
    }

    group.finish();
}

fn bench_formulas(c: &mut Criterion) {
    let mut group = c.benchmark_group("formulas");
    let grid = sales_grid(1000);

    group.bench_function("sum_1000", |b| {
        b.iter(|| gridwise_formulas::evaluate(black_box("=SUM(C2:C1001)"), &grid))
    });

    group.bench_function("nested", |b| {
        b.iter(|| gridwise_formulas::evaluate(black_box("=(C2+C3)*D4/MAX(D2:D50)"), &grid))
    });

    group.finish();
}

fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");

    for size in [100, 1000, 10000].iter() {
        let grid = sales_grid(*size);
        group.bench_with_input(BenchmarkId::new("profile", size), size, |b, _| {
            b.iter(|| gridwise_profiler::profile(black_box(&grid)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_instructions,
    bench_execute_commands,
    bench_formulas,
    bench_profile
);
criterion_main!(benches);
