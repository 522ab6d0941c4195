//! Caller-owned state across successive instructions.

use crate::{Context, Interpreter};
use gridwise_core::{FormatOverlay, FreezePanes, Grid, OperationResult};
use serde::{Deserialize, Serialize};

/// The current grid plus its view state.
///
/// The overlay accumulates across formatting and highlight results until a
/// result replaces the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub grid: Grid,
    #[serde(default)]
    pub overlay: FormatOverlay,
    #[serde(default)]
    pub freeze: FreezePanes,
}

impl Session {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            overlay: FormatOverlay::new(),
            freeze: FreezePanes::default(),
        }
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(&self.grid, &self.overlay).with_freeze(self.freeze)
    }

    /// Run an instruction against this session and adopt its result.
    pub fn run(&mut self, interpreter: &Interpreter, prompt: &str) -> OperationResult {
        let result = interpreter.execute_in(&self.context(), prompt);
        self.apply(&result);
        result
    }

    /// Adopt the parts of a result that change state.
    ///
    /// A new grid clears the overlay, whose coordinates no longer line up,
    /// unless the result carries its own overlay.
    pub fn apply(&mut self, result: &OperationResult) {
        if let Some(grid) = &result.new_grid {
            self.grid = grid.clone();
            self.overlay = FormatOverlay::new();
        }
        if let Some(overlay) = &result.format_overlay {
            self.overlay = overlay.clone();
        }
        if let Some(freeze) = result.freeze_panes {
            self.freeze = freeze;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwise_core::{CellFormat, CellRef};

    #[test]
    fn test_apply_new_grid_clears_overlay() {
        let mut session = Session::new(Grid::from_data(vec![vec![1]]));
        session.overlay.apply(CellRef::new(0, 0), &CellFormat::bold());

        session.apply(&OperationResult::with_grid("done", Grid::from_data(vec![vec![2]])));
        assert!(session.overlay.is_empty());
        assert_eq!(session.grid, Grid::from_data(vec![vec![2]]));
    }

    #[test]
    fn test_apply_keeps_grid_for_message_results() {
        let grid = Grid::from_data(vec![vec![1]]);
        let mut session = Session::new(grid.clone());
        session.apply(&OperationResult::message("Sum = 1"));
        assert_eq!(session.grid, grid);
        assert_eq!(session.freeze, FreezePanes::default());
    }
}
