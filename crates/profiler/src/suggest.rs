//! Suggestions derived from a [`DataStructure`].
//!
//! Every function here is pure; the same structure always yields the same
//! texts in the same order.

use crate::{ColumnType, DataStructure, PatternTag};
use serde::{Deserialize, Serialize};

const MAX_QUESTIONS: usize = 5;
const MAX_TRANSFORMATIONS: usize = 6;
const MAX_CHARTS: usize = 3;
const MAX_PROMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
}

impl ChartSuggestion {
    fn new(kind: &str, reason: &str) -> Self {
        Self {
            kind: kind.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Every suggestion list for one structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub follow_up_questions: Vec<String>,
    pub transformation_suggestions: Vec<String>,
    pub chart_suggestions: Vec<ChartSuggestion>,
    pub quality_insights: Vec<String>,
    pub smart_prompts: Vec<String>,
}

impl Suggestions {
    pub fn from_structure(structure: &DataStructure) -> Self {
        Self {
            follow_up_questions: follow_up_questions(structure),
            transformation_suggestions: transformation_suggestions(structure),
            chart_suggestions: chart_suggestions(structure),
            quality_insights: quality_insights(structure),
            smart_prompts: smart_prompts(structure),
        }
    }
}

fn first_name(structure: &DataStructure, column_type: ColumnType) -> Option<&str> {
    structure
        .columns_of(column_type)
        .next()
        .map(|c| c.name.as_str())
}

fn first_two_numbers(structure: &DataStructure) -> Option<(&str, &str)> {
    let mut numbers = structure.columns_of(ColumnType::Number);
    match (numbers.next(), numbers.next()) {
        (Some(a), Some(b)) => Some((a.name.as_str(), b.name.as_str())),
        _ => None,
    }
}

fn owned(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| (*s).to_string()).collect()
}

pub fn follow_up_questions(structure: &DataStructure) -> Vec<String> {
    let mut questions = owned(structure.detected_format.playbook().questions);

    if let Some((a, b)) = first_two_numbers(structure) {
        questions.push(format!("How does {a} correlate with {b}?"));
    }
    if let (Some(text), Some(number)) = (
        first_name(structure, ColumnType::Text),
        first_name(structure, ColumnType::Number),
    ) {
        questions.push(format!("Which {text} has the highest {number}?"));
    }

    questions.truncate(MAX_QUESTIONS);
    questions
}

pub fn transformation_suggestions(structure: &DataStructure) -> Vec<String> {
    let mut suggestions = Vec::new();

    if structure
        .columns_of(ColumnType::Text)
        .any(|c| c.pattern == Some(PatternTag::Email))
    {
        suggestions.push(String::from("Extract domain names from email addresses"));
    }
    if structure.count_of(ColumnType::Number) > 1 {
        suggestions.push(String::from(
            "Calculate ratios and percentages between numeric columns",
        ));
        suggestions.push(String::from(
            "Create summary statistics (min, max, average, median)",
        ));
    }
    if structure.count_of(ColumnType::Date) > 0 {
        suggestions.push(String::from("Extract year, month, quarter from dates"));
        suggestions.push(String::from("Calculate time differences and durations"));
    }
    suggestions.extend(owned(structure.detected_format.playbook().transformations));

    suggestions.truncate(MAX_TRANSFORMATIONS);
    suggestions
}

pub fn chart_suggestions(structure: &DataStructure) -> Vec<ChartSuggestion> {
    let numbers = structure.count_of(ColumnType::Number);
    let texts = structure.count_of(ColumnType::Text);
    let dates = structure.count_of(ColumnType::Date);
    let mut charts = Vec::new();

    if dates > 0 && numbers > 0 {
        charts.push(ChartSuggestion::new(
            "line",
            "Perfect for showing trends over time",
        ));
    }
    if texts > 0 && numbers > 0 {
        charts.push(ChartSuggestion::new(
            "bar",
            "Great for comparing values across categories",
        ));
        charts.push(ChartSuggestion::new(
            "pie",
            "Shows proportional breakdown of categories",
        ));
    }
    if let Some(chart) = structure.detected_format.playbook().chart {
        charts.push(ChartSuggestion::new(chart.kind, chart.reason));
    }

    charts.truncate(MAX_CHARTS);
    charts
}

fn percent(share: f64) -> i64 {
    (share * 100.0).round() as i64
}

pub fn quality_insights(structure: &DataStructure) -> Vec<String> {
    let quality = &structure.data_quality;
    let mut insights = Vec::new();

    if quality.completeness < 0.7 {
        insights.push(format!(
            "Warning: data is only {}% complete - consider cleaning missing values",
            percent(quality.completeness)
        ));
    } else if quality.completeness > 0.95 {
        insights.push(format!(
            "Excellent data completeness ({}%)",
            percent(quality.completeness)
        ));
    }

    if quality.duplicate_rows > 0 {
        insights.push(format!(
            "Found {} duplicate rows - consider removing for cleaner analysis",
            quality.duplicate_rows
        ));
    }

    let mostly_empty = structure
        .columns
        .iter()
        .filter(|c| c.null_count as f64 > c.sampled_rows as f64 * 0.5)
        .count();
    if mostly_empty > 0 {
        insights.push(format!(
            "{mostly_empty} columns are mostly empty - consider removing or investigating"
        ));
    }

    let identifiers = structure
        .columns
        .iter()
        .filter(|c| c.sampled_rows > 0 && c.unique_count == c.sampled_rows)
        .count();
    if identifiers > 0 {
        insights.push(format!("{identifiers} columns contain unique identifiers"));
    }

    insights
}

pub fn smart_prompts(structure: &DataStructure) -> Vec<String> {
    let mut prompts = owned(structure.detected_format.playbook().prompts);

    if let Some((a, b)) = first_two_numbers(structure) {
        prompts.push(format!("compare {a} vs {b} with charts"));
        prompts.push(format!("calculate correlation between {a} and {b}"));
    }
    if let (Some(text), Some(number)) = (
        first_name(structure, ColumnType::Text),
        first_name(structure, ColumnType::Number),
    ) {
        prompts.push(format!("analyze {number} by {text} categories"));
        prompts.push(format!("create breakdown of {number} across {text}"));
    }

    prompts.push(String::from("create summary statistics for all numeric data"));
    prompts.push(String::from("highlight outliers and unusual values"));
    prompts.push(String::from("generate data quality report"));

    prompts.truncate(MAX_PROMPTS);
    prompts
}

/// Context preamble plus the user's request, as sent to the remote model.
pub fn enhance_prompt(prompt: &str, structure: &DataStructure) -> String {
    let key_columns = structure
        .columns
        .iter()
        .take(3)
        .map(|c| format!("{} ({})", c.name, c.column_type.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} Data format: {}. Columns: {} numeric, {} text, {} date. Key columns: {}. User request: {}. Provide focused analysis without raw data dumps.",
        structure.detected_format.playbook().context,
        structure.detected_format,
        structure.count_of(ColumnType::Number),
        structure.count_of(ColumnType::Text),
        structure.count_of(ColumnType::Date),
        key_columns,
        prompt.trim()
    )
}
