use crate::error::OperationError;
use crate::format::{FormatOverlay, FreezePanes};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Rows of `new_grid` rendered into `preview`.
pub const PREVIEW_ROWS: usize = 5;

/// Outcome of one instruction.
///
/// Every local operation produces one of these, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_grid: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_overlay: Option<FormatOverlay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_panes: Option<FreezePanes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl OperationResult {
    /// A message-only result.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            new_grid: None,
            format_overlay: None,
            freeze_panes: None,
            preview: None,
            error: None,
        }
    }

    /// A result carrying a replacement grid and its preview.
    pub fn with_grid(message: impl Into<String>, grid: Grid) -> Self {
        let mut result = Self::message(message);
        result.preview = Some(grid.preview(PREVIEW_ROWS));
        result.new_grid = Some(grid);
        result
    }

    pub fn with_overlay(message: impl Into<String>, overlay: FormatOverlay) -> Self {
        let mut result = Self::message(message);
        result.format_overlay = Some(overlay);
        result
    }

    pub fn with_freeze(message: impl Into<String>, freeze: FreezePanes) -> Self {
        let mut result = Self::message(message);
        result.freeze_panes = Some(freeze);
        result
    }

    /// A failed result; the message is the error's display text.
    #[must_use]
    pub fn failure(error: OperationError) -> Self {
        let mut result = Self::message(error.to_string());
        result.error = Some(error);
        result
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn is_unhandled(&self) -> bool {
        matches!(self.error, Some(OperationError::Unhandled))
    }
}

impl From<OperationError> for OperationResult {
    fn from(error: OperationError) -> Self {
        Self::failure(error)
    }
}
