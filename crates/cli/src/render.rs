//! Plain-text and JSON rendering of results, grids and profiles.

use anyhow::Result;
use gridwise_core::{Grid, OperationResult};
use gridwise_profiler::{DataStructure, Suggestions};
use serde_json::json;

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Aligned text table (default)
    #[default]
    Table,
}

/// Longest cell shown in a table column.
const MAX_CELL_WIDTH: usize = 24;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let kept: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{kept}…")
    }
}

/// Left-aligned columns separated by ` | `, header underlined.
pub fn table(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return "(empty table)".to_string();
    }

    let clipped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| (0..width).map(|c| clip(row.get(c).map_or("", String::as_str))).collect())
        .collect();
    let widths: Vec<usize> = (0..width)
        .map(|c| clipped.iter().map(|row| row[c].chars().count()).max().unwrap_or(0))
        .collect();

    let line = |row: &[String]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(clipped.len() + 1);
    for (i, row) in clipped.iter().enumerate() {
        out.push(line(row));
        if i == 0 {
            out.push(
                widths
                    .iter()
                    .map(|w| "-".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("-+-"),
            );
        }
    }
    out.join("\n")
}

pub fn grid(grid: &Grid, limit: usize) -> String {
    let mut text = table(&grid.preview(limit));
    if grid.row_count() > limit {
        text.push_str(&format!("\n… {} more rows", grid.row_count() - limit));
    }
    text
}

/// Body of a result below its message line.
pub fn result_details(result: &OperationResult, format: OutputFormat) -> Result<Option<String>> {
    if format == OutputFormat::Json {
        return Ok(Some(serde_json::to_string_pretty(result)?));
    }

    let mut parts = Vec::new();
    if let Some(preview) = &result.preview {
        parts.push(table(preview));
    }
    if let Some(overlay) = &result.format_overlay {
        parts.push(format!(
            "{} formatted cells across {} rows",
            overlay.len(),
            overlay.formatted_rows().len()
        ));
    }
    if let Some(freeze) = result.freeze_panes {
        parts.push(format!(
            "Frozen: rows {}, columns {}",
            if freeze.rows { "yes" } else { "no" },
            if freeze.columns { "yes" } else { "no" }
        ));
    }
    Ok((!parts.is_empty()).then(|| parts.join("\n")))
}

pub fn profile(structure: &DataStructure, suggestions: &Suggestions, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let value = json!({ "structure": structure, "suggestions": suggestions });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = vec![
        format!(
            "{} data rows, {} columns, headers: {}, format: {}",
            structure.row_count,
            structure.column_count,
            if structure.has_headers { "yes" } else { "no" },
            structure.detected_format
        ),
        format!(
            "Completeness {:.0}%, consistency {:.0}%, {} duplicate rows",
            structure.data_quality.completeness * 100.0,
            structure.data_quality.consistency * 100.0,
            structure.data_quality.duplicate_rows
        ),
        String::new(),
    ];

    let mut columns = vec![vec![
        "Column".to_string(),
        "Type".to_string(),
        "Empty".to_string(),
        "Unique".to_string(),
    ]];
    columns.extend(structure.columns.iter().map(|c| {
        vec![
            c.name.clone(),
            c.column_type.as_str().to_string(),
            c.null_count.to_string(),
            c.unique_count.to_string(),
        ]
    }));
    out.push(table(&columns));

    let sections: [(&str, Vec<String>); 4] = [
        ("Insights", suggestions.quality_insights.clone()),
        ("Try asking", suggestions.smart_prompts.clone()),
        ("Transformations", suggestions.transformation_suggestions.clone()),
        (
            "Charts",
            suggestions
                .chart_suggestions
                .iter()
                .map(|c| format!("{}: {}", c.kind, c.reason))
                .collect(),
        ),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        out.push(String::new());
        out.push(format!("{title}:"));
        out.extend(items.iter().map(|item| format!("  - {item}")));
    }
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwise_core::{FormatOverlay, FreezePanes};

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_table_alignment() {
        let rows = strings(&[&["Name", "Qty"], &["pen", "10"], &["highlighter"]]);
        assert_eq!(
            table(&rows),
            "Name        | Qty\n------------+----\npen         | 10\nhighlighter |"
        );
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(table(&[]), "(empty table)");
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_WIDTH);
    }

    #[test]
    fn test_grid_mentions_hidden_rows() {
        let g = Grid::from_data((0..8).map(|i| vec![i]));
        assert!(grid(&g, 5).ends_with("… 3 more rows"));
    }

    #[test]
    fn test_message_only_result_has_no_details() {
        let result = OperationResult::message("Sum = 3");
        assert_eq!(result_details(&result, OutputFormat::Table).unwrap(), None);
    }

    #[test]
    fn test_result_details() {
        let mut result = OperationResult::with_freeze("Froze", FreezePanes { rows: true, columns: false });
        result.format_overlay = Some(FormatOverlay::new());
        let details = result_details(&result, OutputFormat::Table).unwrap().unwrap();
        assert!(details.contains("0 formatted cells"));
        assert!(details.contains("Frozen: rows yes, columns no"));

        let json = result_details(&result, OutputFormat::Json).unwrap().unwrap();
        assert!(json.contains("\"freezePanes\""));
    }

    #[test]
    fn test_profile_text() {
        let g = Grid::from_data(vec![vec!["Product", "Price"], vec!["pen", "2"], vec!["ink", "3"]]);
        let structure = gridwise_profiler::profile(&g).unwrap();
        let suggestions = Suggestions::from_structure(&structure);
        let text = profile(&structure, &suggestions, OutputFormat::Table).unwrap();
        assert!(text.starts_with("2 data rows, 2 columns, headers: yes"), "{text}");
        assert!(text.contains("Price"));
    }
}
