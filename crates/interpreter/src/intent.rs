//! Instruction recognition.
//!
//! [`CommandParser::parse`] maps a free-text instruction onto one of a closed
//! set of [`Intent`]s. Patterns are tried in a fixed priority order and the
//! first match wins; anything else is [`Intent::Unhandled`].

use gridwise_core::{column_index, Alignment, CellRange, CellRef, HighlightColor};
use gridwise_pivot::PivotOp;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;

/// Optional lead-in accepted before arithmetic and aggregate phrasings.
const LEAD: &str = r"(?:(?:please\s+)?(?:what\s+is|what's|whats|calculate|compute|get|find|show(?:\s+me)?|give\s+me|tell\s+me)\s+)?(?:the\s+)?";
const CELL: &str = r"[a-z]{1,3}\d+";

/// Rows highlighted by "top"/"bottom" when no count is given.
pub const DEFAULT_HIGHLIGHT_COUNT: usize = 10;

lazy_static! {
    static ref COLUMN_SUM: Regex = Regex::new(&format!(
        r"^{LEAD}(?:sum|total)\s+(?:of\s+)?(?:the\s+)?(?:column|col)\s+([a-z]{{1,3}})$"
    ))
    .unwrap();

    static ref WORD_PAIR: Regex = Regex::new(&format!(
        r"^{LEAD}({CELL})\s+(plus|minus|times|multiplied\s+by|divided\s+by|over)\s+({CELL})$"
    ))
    .unwrap();
    static ref ADD_PAIR: Regex =
        Regex::new(&format!(r"^{LEAD}add\s+({CELL})\s+(?:and|to|with|plus)\s+({CELL})$")).unwrap();
    static ref SUBTRACT_PAIR: Regex =
        Regex::new(&format!(r"^{LEAD}subtract\s+({CELL})\s+from\s+({CELL})$")).unwrap();
    static ref MULTIPLY_PAIR: Regex =
        Regex::new(&format!(r"^{LEAD}multiply\s+({CELL})\s+(?:by|and|with)\s+({CELL})$")).unwrap();
    static ref DIVIDE_PAIR: Regex =
        Regex::new(&format!(r"^{LEAD}divide\s+({CELL})\s+by\s+({CELL})$")).unwrap();
    static ref LIST_SUM: Regex = Regex::new(&format!(
        r"^{LEAD}(?:sum|total|add)(?:\s+up)?(?:\s+of)?\s+({CELL}(?:(?:\s*(?:,|\+|&|\band\b)\s*|\s+){CELL})+)$"
    ))
    .unwrap();
    static ref SYMBOLIC_PAIR: Regex =
        Regex::new(&format!(r"^=?\s*({CELL})\s*([+\-*/])\s*({CELL})$")).unwrap();
    static ref SYMBOLIC_EXPR: Regex = Regex::new(&format!(
        r"^{LEAD}=?\s*((?:[\s()+\-*/.\d]*{CELL})+[\s()+\-*/.\d]*)$"
    ))
    .unwrap();
    static ref CELL_TOKEN: Regex = Regex::new(CELL).unwrap();

    static ref RANGE_AGGREGATE: Regex = Regex::new(&format!(
        r"^{LEAD}(sum|total|average|avg|mean|counta|count|max(?:imum)?|min(?:imum)?)\s+(?:of\s+|for\s+|in\s+)?(?:the\s+)?(?:range\s+|cells\s+|values\s+(?:in\s+|from\s+)?)?(?:from\s+)?({CELL})\s*(?::|-|\bto\b|\bthrough\b|\bthru\b)\s*({CELL})$"
    ))
    .unwrap();
    static ref COLUMN_AGGREGATE: Regex = Regex::new(&format!(
        r"^{LEAD}(average|avg|mean|counta|count|max(?:imum)?|min(?:imum)?)\s+(?:value\s+)?(?:of\s+|in\s+|for\s+)?(?:the\s+)?(?:column|col)\s+([a-z]{{1,3}})$"
    ))
    .unwrap();

    static ref UNFREEZE: Regex = Regex::new(r"\bunfreeze\b").unwrap();
    static ref FREEZE: Regex = Regex::new(r"\bfreeze\b").unwrap();
    static ref MENTIONS_ROW: Regex = Regex::new(r"\b(?:rows?|header)\b").unwrap();
    static ref MENTIONS_COLUMN: Regex = Regex::new(r"\bcolumns?\b").unwrap();
    static ref MENTIONS_BOTH: Regex = Regex::new(r"\bboth\b").unwrap();

    static ref PERCENTAGE: Regex = Regex::new(&format!(
        r"^{LEAD}(?:percentage\s+breakdown|percent\s+breakdown|percentage|breakdown|distribution)\s+(?:of\s+(?:rows|records)\s+)?by\s+(.+)$"
    ))
    .unwrap();
    static ref GROUP_BY: Regex = Regex::new(
        r"^(?:create\s+(?:a\s+)?)?(?:pivot(?:\s+table)?|group)\s+(?:the\s+data\s+|rows\s+)?by\s+(.+?)(?:\s+and\s+(.+?))?(?:\s+(?:with\s+|showing\s+)?(sum|total|count|average|avg|mean)(?:\s+of\s+(.+))?)?$"
    )
    .unwrap();
    static ref OP_OF_BY: Regex = Regex::new(&format!(
        r"^{LEAD}(sum|total|count|average|avg|mean)\s+(?:of\s+)?(.+?)\s+(?:by|per)\s+(.+?)(?:\s+and\s+(.+))?$"
    ))
    .unwrap();

    static ref FIND_AND_REPLACE: Regex = Regex::new(
        r#"(?i)^find\s+["']?(.+?)["']?\s+and\s+replace\s+(?:it\s+|them\s+|all\s+)?with\s+["']?(.*?)["']?$"#
    )
    .unwrap();
    static ref REPLACE: Regex = Regex::new(
        r#"(?i)^replace\s+(?:all\s+)?(?:occurrences\s+of\s+)?["']?(.+?)["']?\s+with\s+["']?(.*?)["']?$"#
    )
    .unwrap();

    static ref REMOVE_DUPLICATES: Regex = Regex::new(
        r"\b(?:remove|delete|drop|eliminate|clear)\s+(?:all\s+)?(?:the\s+)?duplicates?\b|\bdedupe?\b|\bdeduplicate\b"
    )
    .unwrap();
    static ref IN_COLUMN: Regex =
        Regex::new(r"\b(?:in|by|on|from|using|based\s+on)\s+column\s+([a-z]{1,3})\b").unwrap();

    static ref BOLD: Regex = Regex::new(r"\bbold\b").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\bitalic(?:s|ize)?\b").unwrap();
    static ref ALIGN: Regex = Regex::new(
        r"\b(left|right|cent(?:er|re))[\s-]+align(?:ed)?\b|\balign(?:ed)?\s+(?:to\s+(?:the\s+)?)?(left|right|cent(?:er|re))\b|^(?:please\s+)?(cent(?:er|re))\b|\b(?:make|set|format)\b.*\b(cent(?:er|re))(?:ed)?\b"
    )
    .unwrap();
    static ref COLORED_TEXT: Regex = Regex::new(
        r"\b(red|blue|green|yellow|orange|purple|pink|gr[ae]y|black)\s+(?:text|font)\b|\b(?:text|font)\s+(?:colou?r\s+)?(?:to\s+)?(red|blue|green|yellow|orange|purple|pink|gr[ae]y|black)\b"
    )
    .unwrap();
    static ref TARGET_RANGE: Regex = Regex::new(&format!(
        r"\b({CELL})\s*(?::|-|\bto\b|\bthrough\b)\s*({CELL})\b"
    ))
    .unwrap();
    static ref TARGET_CELL: Regex = Regex::new(&format!(r"\b({CELL})\b")).unwrap();

    static ref HIGHLIGHT: Regex = Regex::new(
        r"\bhighlight(?:s|ed|ing)?\b|^(?:shade|colou?r)\s+(?:the\s+)?(?:rows?|columns?|top|bottom|odd|even|all)\b"
    )
    .unwrap();
    static ref TOP_ROWS: Regex = Regex::new(r"\b(?:top|first)(?:\s+(\d+))?\b").unwrap();
    static ref BOTTOM_ROWS: Regex = Regex::new(r"\b(?:bottom|last)(?:\s+(\d+))?\b").unwrap();
    static ref ODD_ROWS: Regex = Regex::new(r"\bodd\b").unwrap();
    static ref EVEN_ROWS: Regex = Regex::new(r"\beven\b").unwrap();
    static ref ROW_SPAN: Regex =
        Regex::new(r"\brows?\s+(\d+)\s*(?:-|\bto\b|\bthrough\b)\s*(\d+)\b").unwrap();
    static ref SINGLE_ROW: Regex = Regex::new(r"\brow\s+(\d+)\b").unwrap();
    static ref COLUMN_SPAN: Regex = Regex::new(
        r"\bcolumns?\s+([a-z]{1,3})\s*(?:-|:|\bto\b|\bthrough\b)\s*([a-z]{1,3})\b"
    )
    .unwrap();
    static ref SINGLE_COLUMN: Regex = Regex::new(r"\bcolumn\s+([a-z]{1,3})\b").unwrap();

    static ref SORT: Regex = Regex::new(
        r"^sort\s+(?:the\s+)?(?:data\s+|rows\s+|table\s+|sheet\s+)?(?:by\s+)?(.+?)(?:\s+(?:in\s+)?(asc|ascending|desc|descending|high(?:est)?\s+to\s+low(?:est)?|low(?:est)?\s+to\s+high(?:est)?|a\s*-\s*z|z\s*-\s*a)(?:\s+order)?)?$"
    )
    .unwrap();
    static ref FILTER_COLUMN: Regex = Regex::new(
        r#"(?i)^(?:filter|show|keep|find)\s+(?:only\s+)?(?:the\s+)?rows\s+where\s+(.+?)\s+(?:contains|includes|has)\s+["']?(.+?)["']?$"#
    )
    .unwrap();
    static ref FILTER_ANY: Regex = Regex::new(
        r#"(?i)^(?:filter|show|keep|find)\s+(?:only\s+)?(?:the\s+)?rows\s+(?:containing|that\s+contain|with|matching)\s+["']?(.+?)["']?$"#
    )
    .unwrap();
    static ref STATISTICS: Regex = Regex::new(
        r"^(?:show\s+(?:me\s+)?|get\s+|give\s+me\s+|calculate\s+)?(?:the\s+)?(?:summary\s+)?(?:stats|statistics)\s+(?:for|of|on)\s+(?:the\s+)?(.+?)(?:\s+column)?$|^describe\s+(?:the\s+)?(.+?)(?:\s+column)?$"
    )
    .unwrap();
}

/// Words that look like column letters but never name a column.
const COLUMN_STOP_WORDS: [&str; 7] = ["and", "in", "of", "to", "the", "all", "for"];

/// Value words that mean "count rows" in a pivot request.
const ROW_WORDS: [&str; 6] = ["rows", "row", "records", "entries", "items", "data"];

/// Arithmetic between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub fn symbol(self) -> char {
        match self {
            ArithmeticOp::Add => '+',
            ArithmeticOp::Subtract => '-',
            ArithmeticOp::Multiply => '*',
            ArithmeticOp::Divide => '/',
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" | "plus" => Some(ArithmeticOp::Add),
            "-" | "minus" => Some(ArithmeticOp::Subtract),
            "*" | "times" => Some(ArithmeticOp::Multiply),
            "/" | "over" => Some(ArithmeticOp::Divide),
            s if s.starts_with("multiplied") => Some(ArithmeticOp::Multiply),
            s if s.starts_with("divided") => Some(ArithmeticOp::Divide),
            _ => None,
        }
    }
}

/// The operands of a cell arithmetic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellExpression {
    Pair {
        op: ArithmeticOp,
        left: CellRef,
        right: CellRef,
    },
    ListSum(Vec<CellRef>),
    /// Expression text in formula syntax, upper-cased
    Formula(String),
}

/// Aggregations over a range or a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Sum,
    Average,
    Count,
    CountA,
    Max,
    Min,
}

impl AggregateOp {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "sum" | "total" => Some(AggregateOp::Sum),
            "average" | "avg" | "mean" => Some(AggregateOp::Average),
            "count" => Some(AggregateOp::Count),
            "counta" => Some(AggregateOp::CountA),
            "max" | "maximum" => Some(AggregateOp::Max),
            "min" | "minimum" => Some(AggregateOp::Min),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AggregateOp::Sum => "Sum",
            AggregateOp::Average => "Average",
            AggregateOp::Count => "Count",
            AggregateOp::CountA => "Non-empty count",
            AggregateOp::Max => "Maximum",
            AggregateOp::Min => "Minimum",
        }
    }
}

/// A column named by letters or by a header fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOperand {
    Letter(usize),
    Name(String),
}

impl ColumnOperand {
    /// "column b" and one- or two-letter words are letters; anything else
    /// is a header fragment.
    fn parse(text: &str) -> Self {
        let text = text.trim();
        let (explicit, word) = match text
            .strip_prefix("column ")
            .or_else(|| text.strip_prefix("col "))
        {
            Some(rest) => (true, rest.trim()),
            None => (false, text),
        };

        let max_len = if explicit { 3 } else { 2 };
        let letters = word.len() <= max_len && word.chars().all(|c| c.is_ascii_alphabetic());
        match column_index(word) {
            Ok(index) if letters => ColumnOperand::Letter(index),
            _ => ColumnOperand::Name(word.to_string()),
        }
    }
}

impl fmt::Display for ColumnOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOperand::Letter(index) => {
                write!(f, "column {}", gridwise_core::column_letters(*index))
            }
            ColumnOperand::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

/// Target of a freeze request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeTarget {
    FirstRow,
    FirstColumn,
    Both,
    Unfreeze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotRequest {
    GroupBy {
        group: String,
        second: Option<String>,
        value: Option<String>,
        op: PivotOp,
    },
    Percentage {
        group: String,
    },
}

/// Text styles applied by a formatting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Italic,
    Align(Alignment),
    Color(HighlightColor),
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextStyle::Bold => f.write_str("bold"),
            TextStyle::Italic => f.write_str("italic"),
            TextStyle::Align(Alignment::Left) => f.write_str("left alignment"),
            TextStyle::Align(Alignment::Center) => f.write_str("center alignment"),
            TextStyle::Align(Alignment::Right) => f.write_str("right alignment"),
            TextStyle::Color(color) => write!(f, "{} text", color.name()),
        }
    }
}

/// Data rows picked by a highlight request. Row numbers count data rows,
/// so row 1 is the first row under the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelector {
    All,
    Top(usize),
    Bottom(usize),
    Odd,
    Even,
    Row(usize),
    Rows(usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSelector {
    All,
    Column(usize),
    Columns(usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRequest {
    pub color: HighlightColor,
    pub rows: RowSelector,
    pub columns: ColumnSelector,
}

/// A recognized instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Sum of a whole column, header skipped
    ColumnAggregate { column: usize },
    CellArithmetic(CellExpression),
    RangeAggregate { op: AggregateOp, range: CellRange },
    ColumnWholeAggregate { op: AggregateOp, column: usize },
    FreezePanes(FreezeTarget),
    PivotGroupBy(PivotRequest),
    FindReplace { find: String, replace: String },
    RemoveDuplicates { column: Option<usize> },
    /// `target` is `None` when the instruction named no cells
    Formatting {
        style: TextStyle,
        target: Option<CellRange>,
    },
    Highlighting(HighlightRequest),
    SortRows {
        column: ColumnOperand,
        descending: bool,
    },
    FilterRows {
        column: Option<ColumnOperand>,
        needle: String,
    },
    ColumnStatistics { column: ColumnOperand },
    Unhandled,
}

impl Intent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::ColumnAggregate { .. } => "column_aggregate",
            Intent::CellArithmetic(_) => "cell_arithmetic",
            Intent::RangeAggregate { .. } => "range_aggregate",
            Intent::ColumnWholeAggregate { .. } => "column_whole_aggregate",
            Intent::FreezePanes(_) => "freeze_panes",
            Intent::PivotGroupBy(_) => "pivot_group_by",
            Intent::FindReplace { .. } => "find_replace",
            Intent::RemoveDuplicates { .. } => "remove_duplicates",
            Intent::Formatting { .. } => "formatting",
            Intent::Highlighting(_) => "highlighting",
            Intent::SortRows { .. } => "sort_rows",
            Intent::FilterRows { .. } => "filter_rows",
            Intent::ColumnStatistics { .. } => "column_statistics",
            Intent::Unhandled => "unhandled",
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, Intent::Unhandled)
    }
}

/// Maps instructions onto intents.
pub struct CommandParser;

impl CommandParser {
    /// Recognize `prompt`. Never fails; unknown instructions are
    /// [`Intent::Unhandled`].
    pub fn parse(prompt: &str) -> Intent {
        let original = prompt.trim();
        let lower = normalize(original);
        if lower.is_empty() {
            return Intent::Unhandled;
        }

        let steps: [fn(&str, &str) -> Option<Intent>; 13] = [
            |l, _| parse_column_sum(l),
            |l, _| parse_arithmetic(l),
            |l, _| parse_range_aggregate(l),
            |l, _| parse_column_aggregate(l),
            |l, _| parse_freeze(l),
            |l, _| parse_pivot(l),
            |_, o| parse_find_replace(o),
            |l, _| parse_remove_duplicates(l),
            |l, _| parse_formatting(l),
            |l, _| parse_highlighting(l),
            |l, _| parse_sort(l),
            |_, o| parse_filter(o),
            |l, _| parse_statistics(l),
        ];

        steps
            .iter()
            .find_map(|step| step(&lower, original))
            .unwrap_or(Intent::Unhandled)
    }
}

/// Lower-case, trim, collapse whitespace and drop trailing punctuation.
fn normalize(prompt: &str) -> String {
    prompt
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_string()
}

fn cell(caps: &Captures<'_>, group: usize) -> Option<CellRef> {
    caps.get(group).and_then(|m| CellRef::parse(m.as_str()).ok())
}

fn letters(caps: &Captures<'_>, group: usize) -> Option<usize> {
    caps.get(group)
        .filter(|m| !COLUMN_STOP_WORDS.contains(&m.as_str()))
        .and_then(|m| column_index(m.as_str()).ok())
}

fn text(caps: &Captures<'_>, group: usize) -> Option<String> {
    caps.get(group)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_column_sum(lower: &str) -> Option<Intent> {
    let caps = COLUMN_SUM.captures(lower)?;
    Some(Intent::ColumnAggregate {
        column: letters(&caps, 1)?,
    })
}

fn pair(op: ArithmeticOp, left: CellRef, right: CellRef) -> Intent {
    Intent::CellArithmetic(CellExpression::Pair { op, left, right })
}

fn parse_arithmetic(lower: &str) -> Option<Intent> {
    if let Some(caps) = WORD_PAIR.captures(lower) {
        let op = ArithmeticOp::from_symbol(&caps[2])?;
        return Some(pair(op, cell(&caps, 1)?, cell(&caps, 3)?));
    }
    if let Some(caps) = ADD_PAIR.captures(lower) {
        return Some(pair(ArithmeticOp::Add, cell(&caps, 1)?, cell(&caps, 2)?));
    }
    if let Some(caps) = SUBTRACT_PAIR.captures(lower) {
        // "subtract B1 from A1" is A1 - B1
        return Some(pair(ArithmeticOp::Subtract, cell(&caps, 2)?, cell(&caps, 1)?));
    }
    if let Some(caps) = MULTIPLY_PAIR.captures(lower) {
        return Some(pair(ArithmeticOp::Multiply, cell(&caps, 1)?, cell(&caps, 2)?));
    }
    if let Some(caps) = DIVIDE_PAIR.captures(lower) {
        return Some(pair(ArithmeticOp::Divide, cell(&caps, 1)?, cell(&caps, 2)?));
    }
    if let Some(caps) = LIST_SUM.captures(lower) {
        let cells: Vec<CellRef> = CELL_TOKEN
            .find_iter(&caps[1])
            .filter_map(|m| CellRef::parse(m.as_str()).ok())
            .collect();
        if cells.len() >= 2 {
            return Some(Intent::CellArithmetic(CellExpression::ListSum(cells)));
        }
    }

    let caps = SYMBOLIC_EXPR.captures(lower)?;
    let expr = caps[1].trim();
    if !expr.contains(['+', '-', '*', '/']) {
        return None;
    }
    if let Some(pair_caps) = SYMBOLIC_PAIR.captures(expr) {
        let op = ArithmeticOp::from_symbol(&pair_caps[2])?;
        return Some(pair(op, cell(&pair_caps, 1)?, cell(&pair_caps, 3)?));
    }
    Some(Intent::CellArithmetic(CellExpression::Formula(
        expr.to_uppercase(),
    )))
}

fn parse_range_aggregate(lower: &str) -> Option<Intent> {
    let caps = RANGE_AGGREGATE.captures(lower)?;
    Some(Intent::RangeAggregate {
        op: AggregateOp::from_word(&caps[1])?,
        range: CellRange::new(cell(&caps, 2)?, cell(&caps, 3)?),
    })
}

fn parse_column_aggregate(lower: &str) -> Option<Intent> {
    let caps = COLUMN_AGGREGATE.captures(lower)?;
    Some(Intent::ColumnWholeAggregate {
        op: AggregateOp::from_word(&caps[1])?,
        column: letters(&caps, 2)?,
    })
}

fn parse_freeze(lower: &str) -> Option<Intent> {
    if UNFREEZE.is_match(lower) {
        return Some(Intent::FreezePanes(FreezeTarget::Unfreeze));
    }
    if !FREEZE.is_match(lower) {
        return None;
    }

    let row = MENTIONS_ROW.is_match(lower);
    let column = MENTIONS_COLUMN.is_match(lower);
    let target = if MENTIONS_BOTH.is_match(lower) || (row && column) {
        FreezeTarget::Both
    } else if column {
        FreezeTarget::FirstColumn
    } else {
        FreezeTarget::FirstRow
    };
    Some(Intent::FreezePanes(target))
}

fn pivot_value(caps: &Captures<'_>, group: usize) -> Option<String> {
    text(caps, group).filter(|v| !ROW_WORDS.contains(&v.as_str()))
}

fn parse_pivot(lower: &str) -> Option<Intent> {
    if let Some(caps) = PERCENTAGE.captures(lower) {
        return Some(Intent::PivotGroupBy(PivotRequest::Percentage {
            group: text(&caps, 1)?,
        }));
    }

    if let Some(caps) = GROUP_BY.captures(lower) {
        let value = pivot_value(&caps, 4);
        let op = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => PivotOp::Count,
        };
        return Some(Intent::PivotGroupBy(PivotRequest::GroupBy {
            group: text(&caps, 1)?,
            second: text(&caps, 2),
            value,
            op,
        }));
    }

    let caps = OP_OF_BY.captures(lower)?;
    Some(Intent::PivotGroupBy(PivotRequest::GroupBy {
        group: text(&caps, 3)?,
        second: text(&caps, 4),
        value: pivot_value(&caps, 2),
        op: caps[1].parse().ok()?,
    }))
}

fn parse_find_replace(original: &str) -> Option<Intent> {
    let caps = FIND_AND_REPLACE
        .captures(original)
        .or_else(|| REPLACE.captures(original))?;
    Some(Intent::FindReplace {
        find: caps[1].to_string(),
        replace: caps[2].to_string(),
    })
}

fn parse_remove_duplicates(lower: &str) -> Option<Intent> {
    if !REMOVE_DUPLICATES.is_match(lower) {
        return None;
    }
    let column = IN_COLUMN.captures(lower).and_then(|caps| letters(&caps, 1));
    Some(Intent::RemoveDuplicates { column })
}

fn alignment(word: &str) -> Alignment {
    match word {
        "left" => Alignment::Left,
        "right" => Alignment::Right,
        _ => Alignment::Center,
    }
}

fn format_target(lower: &str) -> Option<CellRange> {
    if let Some(caps) = TARGET_RANGE.captures(lower) {
        return Some(CellRange::new(cell(&caps, 1)?, cell(&caps, 2)?));
    }
    TARGET_CELL
        .captures(lower)
        .and_then(|caps| cell(&caps, 1))
        .map(|c| CellRange::new(c, c))
}

fn parse_formatting(lower: &str) -> Option<Intent> {
    if HIGHLIGHT.is_match(lower) {
        return None;
    }

    let style = if BOLD.is_match(lower) {
        TextStyle::Bold
    } else if ITALIC.is_match(lower) {
        TextStyle::Italic
    } else if let Some(caps) = COLORED_TEXT.captures(lower) {
        let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
        TextStyle::Color(HighlightColor::find_in(name))
    } else if let Some(caps) = ALIGN.captures(lower) {
        let word = (1..=4).find_map(|i| caps.get(i))?;
        TextStyle::Align(alignment(word.as_str()))
    } else {
        return None;
    };

    Some(Intent::Formatting {
        style,
        target: format_target(lower),
    })
}

fn count_or_default(caps: &Captures<'_>) -> usize {
    caps.get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_HIGHLIGHT_COUNT)
}

fn row_selector(lower: &str) -> RowSelector {
    if let Some(caps) = ROW_SPAN.captures(lower) {
        let a: usize = caps[1].parse().unwrap_or(0);
        let b: usize = caps[2].parse().unwrap_or(0);
        return RowSelector::Rows(a.min(b), a.max(b));
    }
    if let Some(caps) = SINGLE_ROW.captures(lower) {
        return RowSelector::Row(caps[1].parse().unwrap_or(0));
    }
    if let Some(caps) = TOP_ROWS.captures(lower) {
        return RowSelector::Top(count_or_default(&caps));
    }
    if let Some(caps) = BOTTOM_ROWS.captures(lower) {
        return RowSelector::Bottom(count_or_default(&caps));
    }
    if ODD_ROWS.is_match(lower) {
        return RowSelector::Odd;
    }
    if EVEN_ROWS.is_match(lower) {
        return RowSelector::Even;
    }
    RowSelector::All
}

fn column_selector(lower: &str) -> ColumnSelector {
    if let Some(caps) = COLUMN_SPAN.captures(lower) {
        if let (Some(a), Some(b)) = (letters(&caps, 1), letters(&caps, 2)) {
            return ColumnSelector::Columns(a.min(b), a.max(b));
        }
    }
    SINGLE_COLUMN
        .captures(lower)
        .and_then(|caps| letters(&caps, 1))
        .map_or(ColumnSelector::All, ColumnSelector::Column)
}

fn parse_highlighting(lower: &str) -> Option<Intent> {
    if !HIGHLIGHT.is_match(lower) {
        return None;
    }
    Some(Intent::Highlighting(HighlightRequest {
        color: HighlightColor::find_in(lower),
        rows: row_selector(lower),
        columns: column_selector(lower),
    }))
}

fn parse_sort(lower: &str) -> Option<Intent> {
    let caps = SORT.captures(lower)?;
    let descending = caps.get(2).is_some_and(|m| {
        let word = m.as_str();
        word.starts_with("desc") || word.starts_with("high") || word.starts_with('z')
    });
    Some(Intent::SortRows {
        column: ColumnOperand::parse(&text(&caps, 1)?),
        descending,
    })
}

fn parse_filter(original: &str) -> Option<Intent> {
    if let Some(caps) = FILTER_COLUMN.captures(original) {
        return Some(Intent::FilterRows {
            column: Some(ColumnOperand::parse(&caps[1].to_lowercase())),
            needle: text(&caps, 2)?,
        });
    }
    let caps = FILTER_ANY.captures(original)?;
    Some(Intent::FilterRows {
        column: None,
        needle: text(&caps, 1)?,
    })
}

fn parse_statistics(lower: &str) -> Option<Intent> {
    let caps = STATISTICS.captures(lower)?;
    let target = text(&caps, 1).or_else(|| text(&caps, 2))?;
    Some(Intent::ColumnStatistics {
        column: ColumnOperand::parse(&target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> CellRef {
        CellRef::parse(s).unwrap()
    }

    #[test]
    fn test_column_sum() {
        assert_eq!(
            CommandParser::parse("Sum of column B"),
            Intent::ColumnAggregate { column: 1 }
        );
        assert_eq!(
            CommandParser::parse("what is the total of column AA?"),
            Intent::ColumnAggregate { column: 26 }
        );
    }

    #[test]
    fn test_word_arithmetic() {
        let cases = [
            ("add A1 and B1", ArithmeticOp::Add, "A1", "B1"),
            ("A1 plus B1", ArithmeticOp::Add, "A1", "B1"),
            ("subtract B1 from A1", ArithmeticOp::Subtract, "A1", "B1"),
            ("a1 minus b1", ArithmeticOp::Subtract, "A1", "B1"),
            ("multiply A1 by B1", ArithmeticOp::Multiply, "A1", "B1"),
            ("A1 times B1", ArithmeticOp::Multiply, "A1", "B1"),
            ("divide A1 by B1", ArithmeticOp::Divide, "A1", "B1"),
            ("A1 divided by B1", ArithmeticOp::Divide, "A1", "B1"),
            ("A1/B1", ArithmeticOp::Divide, "A1", "B1"),
            ("calculate =c2 * d2", ArithmeticOp::Multiply, "C2", "D2"),
        ];
        for (prompt, op, left, right) in cases {
            assert_eq!(
                CommandParser::parse(prompt),
                Intent::CellArithmetic(CellExpression::Pair {
                    op,
                    left: cell(left),
                    right: cell(right),
                }),
                "{prompt}"
            );
        }
    }

    #[test]
    fn test_list_sum_and_expression() {
        assert_eq!(
            CommandParser::parse("sum of E2 E3 and E4"),
            Intent::CellArithmetic(CellExpression::ListSum(vec![
                cell("E2"),
                cell("E3"),
                cell("E4")
            ]))
        );
        assert_eq!(
            CommandParser::parse("(A1+B1)*2"),
            Intent::CellArithmetic(CellExpression::Formula("(A1+B1)*2".to_string()))
        );
        assert_eq!(CommandParser::parse("A1"), Intent::Unhandled);
    }

    #[test]
    fn test_range_aggregate_forms() {
        let expected = CellRange::new(cell("A2"), cell("A9"));
        for prompt in [
            "sum of A2:A9",
            "sum A2 - A9",
            "sum of A2 to A9",
            "total of a2 through a9",
            "sum of A9:A2",
        ] {
            assert_eq!(
                CommandParser::parse(prompt),
                Intent::RangeAggregate {
                    op: AggregateOp::Sum,
                    range: expected
                },
                "{prompt}"
            );
        }
        assert_eq!(
            CommandParser::parse("counta of B2:B5"),
            Intent::RangeAggregate {
                op: AggregateOp::CountA,
                range: CellRange::new(cell("B2"), cell("B5"))
            }
        );
    }

    #[test]
    fn test_column_whole_aggregate() {
        assert_eq!(
            CommandParser::parse("max of column C"),
            Intent::ColumnWholeAggregate {
                op: AggregateOp::Max,
                column: 2
            }
        );
        assert_eq!(
            CommandParser::parse("count column a"),
            Intent::ColumnWholeAggregate {
                op: AggregateOp::Count,
                column: 0
            }
        );
    }

    #[test]
    fn test_freeze() {
        assert_eq!(
            CommandParser::parse("freeze the header row"),
            Intent::FreezePanes(FreezeTarget::FirstRow)
        );
        assert_eq!(
            CommandParser::parse("freeze first column"),
            Intent::FreezePanes(FreezeTarget::FirstColumn)
        );
        assert_eq!(
            CommandParser::parse("freeze first row and column"),
            Intent::FreezePanes(FreezeTarget::Both)
        );
        assert_eq!(
            CommandParser::parse("unfreeze"),
            Intent::FreezePanes(FreezeTarget::Unfreeze)
        );
    }

    #[test]
    fn test_pivot_forms() {
        assert_eq!(
            CommandParser::parse("group by region and product sum of sales"),
            Intent::PivotGroupBy(PivotRequest::GroupBy {
                group: "region".into(),
                second: Some("product".into()),
                value: Some("sales".into()),
                op: PivotOp::Sum,
            })
        );
        assert_eq!(
            CommandParser::parse("group by region"),
            Intent::PivotGroupBy(PivotRequest::GroupBy {
                group: "region".into(),
                second: None,
                value: None,
                op: PivotOp::Count,
            })
        );
        assert_eq!(
            CommandParser::parse("average of salary by department"),
            Intent::PivotGroupBy(PivotRequest::GroupBy {
                group: "department".into(),
                second: None,
                value: Some("salary".into()),
                op: PivotOp::Average,
            })
        );
        assert_eq!(
            CommandParser::parse("count of rows by city"),
            Intent::PivotGroupBy(PivotRequest::GroupBy {
                group: "city".into(),
                second: None,
                value: None,
                op: PivotOp::Count,
            })
        );
        assert_eq!(
            CommandParser::parse("percentage breakdown by status"),
            Intent::PivotGroupBy(PivotRequest::Percentage {
                group: "status".into()
            })
        );
    }

    #[test]
    fn test_find_replace_keeps_case() {
        assert_eq!(
            CommandParser::parse("Replace 'NY' with \"New York\""),
            Intent::FindReplace {
                find: "NY".into(),
                replace: "New York".into()
            }
        );
        assert_eq!(
            CommandParser::parse("find Foo and replace with Bar"),
            Intent::FindReplace {
                find: "Foo".into(),
                replace: "Bar".into()
            }
        );
    }

    #[test]
    fn test_remove_duplicates() {
        assert_eq!(
            CommandParser::parse("remove duplicates"),
            Intent::RemoveDuplicates { column: None }
        );
        assert_eq!(
            CommandParser::parse("Delete duplicate rows in column B"),
            Intent::RemoveDuplicates { column: Some(1) }
        );
        assert_eq!(
            CommandParser::parse("dedupe"),
            Intent::RemoveDuplicates { column: None }
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(
            CommandParser::parse("make it bold"),
            Intent::Formatting {
                style: TextStyle::Bold,
                target: None
            }
        );
        assert_eq!(
            CommandParser::parse("italic B2 to B9"),
            Intent::Formatting {
                style: TextStyle::Italic,
                target: Some(CellRange::new(cell("B2"), cell("B9")))
            }
        );
        assert_eq!(
            CommandParser::parse("center align A2:C4"),
            Intent::Formatting {
                style: TextStyle::Align(Alignment::Center),
                target: Some(CellRange::new(cell("A2"), cell("C4")))
            }
        );
        assert_eq!(
            CommandParser::parse("make the text red"),
            Intent::Formatting {
                style: TextStyle::Color(HighlightColor::Red),
                target: None
            }
        );
        assert_eq!(
            CommandParser::parse("red text"),
            Intent::Formatting {
                style: TextStyle::Color(HighlightColor::Red),
                target: None
            }
        );
    }

    #[test]
    fn test_center_alignment_needs_a_command() {
        let centered = |prompt: &str| {
            assert_eq!(
                CommandParser::parse(prompt),
                Intent::Formatting {
                    style: TextStyle::Align(Alignment::Center),
                    target: Some(CellRange::new(cell("A1"), cell("B1")))
                },
                "{prompt}"
            );
        };
        centered("center A1:B1");
        centered("centre the cells A1:B1");
        centered("make A1:B1 centered");
        centered("align center A1:B1");

        assert_eq!(
            CommandParser::parse("filter rows where dept contains center"),
            Intent::FilterRows {
                column: Some(ColumnOperand::Name("dept".into())),
                needle: "center".into()
            }
        );
        assert_eq!(
            CommandParser::parse("show rows containing data center"),
            Intent::FilterRows {
                column: None,
                needle: "data center".into()
            }
        );
        assert_eq!(
            CommandParser::parse("sort by cost center descending"),
            Intent::SortRows {
                column: ColumnOperand::Name("cost center".into()),
                descending: true
            }
        );
        assert_eq!(
            CommandParser::parse("statistics for center"),
            Intent::ColumnStatistics {
                column: ColumnOperand::Name("center".into())
            }
        );
    }

    #[test]
    fn test_highlight_is_not_formatting() {
        assert!(matches!(
            CommandParser::parse("highlight bold rows"),
            Intent::Highlighting(_)
        ));
    }

    #[test]
    fn test_highlight_selectors() {
        let rows = |prompt: &str| match CommandParser::parse(prompt) {
            Intent::Highlighting(request) => request.rows,
            other => panic!("{prompt}: {other:?}"),
        };
        assert_eq!(rows("highlight top 5"), RowSelector::Top(5));
        assert_eq!(rows("highlight top rows"), RowSelector::Top(10));
        assert_eq!(rows("highlight bottom 3 in blue"), RowSelector::Bottom(3));
        assert_eq!(rows("highlight odd rows"), RowSelector::Odd);
        assert_eq!(rows("highlight even rows"), RowSelector::Even);
        assert_eq!(rows("highlight row 4"), RowSelector::Row(4));
        assert_eq!(rows("highlight rows 6-2"), RowSelector::Rows(2, 6));
        assert_eq!(rows("highlight everything"), RowSelector::All);

        let request = |prompt: &str| match CommandParser::parse(prompt) {
            Intent::Highlighting(request) => request,
            other => panic!("{prompt}: {other:?}"),
        };
        assert_eq!(request("highlight column C green").columns, ColumnSelector::Column(2));
        assert_eq!(request("highlight column C green").color, HighlightColor::Green);
        assert_eq!(
            request("highlight columns B-D").columns,
            ColumnSelector::Columns(1, 3)
        );
        assert_eq!(request("highlight column and rows").columns, ColumnSelector::All);
    }

    #[test]
    fn test_supplemented_intents() {
        assert_eq!(
            CommandParser::parse("sort by price descending"),
            Intent::SortRows {
                column: ColumnOperand::Name("price".into()),
                descending: true
            }
        );
        assert_eq!(
            CommandParser::parse("sort by column c"),
            Intent::SortRows {
                column: ColumnOperand::Letter(2),
                descending: false
            }
        );
        assert_eq!(
            CommandParser::parse("show rows containing Oslo"),
            Intent::FilterRows {
                column: None,
                needle: "Oslo".into()
            }
        );
        assert_eq!(
            CommandParser::parse("filter rows where city contains Os"),
            Intent::FilterRows {
                column: Some(ColumnOperand::Name("city".into())),
                needle: "Os".into()
            }
        );
        assert_eq!(
            CommandParser::parse("stats for column B"),
            Intent::ColumnStatistics {
                column: ColumnOperand::Letter(1)
            }
        );
        assert_eq!(
            CommandParser::parse("statistics of salary"),
            Intent::ColumnStatistics {
                column: ColumnOperand::Name("salary".into())
            }
        );
    }

    #[test]
    fn test_unhandled() {
        assert_eq!(CommandParser::parse(""), Intent::Unhandled);
        assert_eq!(
            CommandParser::parse("write me a poem about spreadsheets"),
            Intent::Unhandled
        );
    }
}
