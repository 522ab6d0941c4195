//! CSV and TSV files in and out of a [`Grid`].

use anyhow::{Context, Result};
use gridwise_core::{CellValue, Grid};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Tab for `.tsv` files, comma otherwise.
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Load a delimited file. Every record becomes a row, the header included.
pub fn read_grid(path: &Path) -> Result<Grid> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let grid = grid_from_reader(BufReader::new(file), delimiter_for(path))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(rows = grid.row_count(), cols = grid.col_count(), "loaded {}", path.display());
    Ok(grid)
}

pub fn grid_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }
    Ok(Grid::new(rows))
}

pub fn write_grid(grid: &Grid, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    grid_to_writer(grid, BufWriter::new(file), delimiter_for(path))
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn grid_to_writer<W: Write>(grid: &Grid, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    for row in grid.rows() {
        let record: Vec<String> = row.iter().map(CellValue::as_text).collect();
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
