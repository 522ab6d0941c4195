use crate::cell_ref::CellRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Style applied to one cell. Unset fields leave the cell's style alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
}

impl CellFormat {
    #[must_use]
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text_color(color: &str) -> Self {
        Self {
            text_color: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// Background and text colour of a highlight.
    #[must_use]
    pub fn highlight(color: HighlightColor) -> Self {
        Self {
            background: Some(color.background().to_string()),
            text_color: Some(color.text().to_string()),
            ..Self::default()
        }
    }

    /// Lay `other` over `self`: fields set in `other` win.
    pub fn merge(&mut self, other: &CellFormat) {
        if other.background.is_some() {
            self.background.clone_from(&other.background);
        }
        if other.text_color.is_some() {
            self.text_color.clone_from(&other.text_color);
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.alignment.is_some() {
            self.alignment = other.alignment;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Named highlight palette. The first colour named in a prompt wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Pink,
    Gray,
    Black,
}

impl HighlightColor {
    /// Palette in lookup order.
    pub const ALL: [HighlightColor; 9] = [
        HighlightColor::Red,
        HighlightColor::Blue,
        HighlightColor::Green,
        HighlightColor::Yellow,
        HighlightColor::Orange,
        HighlightColor::Purple,
        HighlightColor::Pink,
        HighlightColor::Gray,
        HighlightColor::Black,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Gray => "gray",
            Self::Black => "black",
        }
    }

    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            Self::Red => "#fef2f2",
            Self::Blue => "#eff6ff",
            Self::Green => "#f0fdf4",
            Self::Yellow => "#fefce8",
            Self::Orange => "#fff7ed",
            Self::Purple => "#faf5ff",
            Self::Pink => "#fdf2f8",
            Self::Gray => "#f9fafb",
            Self::Black => "#f3f4f6",
        }
    }

    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Red => "#dc2626",
            Self::Blue => "#1d4ed8",
            Self::Green => "#16a34a",
            Self::Yellow => "#ca8a04",
            Self::Orange => "#ea580c",
            Self::Purple => "#7e22ce",
            Self::Pink => "#be185d",
            Self::Gray => "#4b5563",
            Self::Black => "#111827",
        }
    }

    /// First palette colour mentioned in `text`, red when none is.
    #[must_use]
    pub fn find_in(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| lower.contains(c.name()) || (*c == Self::Gray && lower.contains("grey")))
            .unwrap_or(Self::Red)
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self::Red
    }
}

/// Sparse per-cell formatting, layered over a grid without touching it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatOverlay {
    cells: BTreeMap<CellRef, CellFormat>,
}

impl FormatOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, cell: CellRef) -> Option<&CellFormat> {
        self.cells.get(&cell)
    }

    /// Merge `format` into the cell's existing style.
    pub fn apply(&mut self, cell: CellRef, format: &CellFormat) {
        self.cells.entry(cell).or_default().merge(format);
    }

    /// Lay every cell of `other` over this overlay.
    pub fn merge(&mut self, other: &FormatOverlay) {
        for (cell, format) in &other.cells {
            self.apply(*cell, format);
        }
    }

    /// Copy of this overlay with `other` laid over it.
    #[must_use]
    pub fn merged(&self, other: &FormatOverlay) -> FormatOverlay {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &CellFormat)> {
        self.cells.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Distinct row indices that carry any formatting.
    #[must_use]
    pub fn formatted_rows(&self) -> BTreeSet<usize> {
        self.cells.keys().map(|c| c.row).collect()
    }
}

/// Frozen header row and/or first column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezePanes {
    pub rows: bool,
    pub columns: bool,
}

impl FreezePanes {
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.rows || self.columns
    }
}
