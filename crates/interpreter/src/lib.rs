//! # gridwise-interpreter
//!
//! Runs free-text spreadsheet instructions locally.
//!
//! An instruction is length-checked, recognized by [`CommandParser`] and
//! executed by the matching builtin. Nothing here touches the network: an
//! instruction no pattern recognizes comes back as an
//! [`OperationError::Unhandled`] result for the caller to forward.
//!
//! ```
//! use gridwise_core::{FormatOverlay, Grid};
//! use gridwise_interpreter::Interpreter;
//!
//! let grid = Grid::from_data(vec![vec!["Item", "Qty"], vec!["pen", "10"], vec!["ink", "50"]]);
//! let result = Interpreter::new().execute(&grid, &FormatOverlay::new(), "sum of column B");
//! assert!(result.message.contains("60"));
//! ```

use gridwise_core::{FormatOverlay, FreezePanes, Grid, OperationError, OperationResult, MAX_PROMPT_CHARS};

mod builtins;
pub mod intent;
pub mod session;

pub use intent::{CommandParser, Intent};
pub use session::Session;

/// Inputs an instruction runs against. The grid is never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub grid: &'a Grid,
    pub overlay: &'a FormatOverlay,
    pub freeze: FreezePanes,
}

impl<'a> Context<'a> {
    pub fn new(grid: &'a Grid, overlay: &'a FormatOverlay) -> Self {
        Self {
            grid,
            overlay,
            freeze: FreezePanes::default(),
        }
    }

    #[must_use]
    pub fn with_freeze(mut self, freeze: FreezePanes) -> Self {
        self.freeze = freeze;
        self
    }
}

/// Local instruction runner.
#[derive(Debug, Clone)]
pub struct Interpreter {
    max_prompt_chars: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            max_prompt_chars: MAX_PROMPT_CHARS,
        }
    }

    #[must_use]
    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    pub fn max_prompt_chars(&self) -> usize {
        self.max_prompt_chars
    }

    /// Reject instructions over the length cap before any parsing.
    pub fn check_prompt(&self, prompt: &str) -> Result<(), OperationError> {
        let len = prompt.chars().count();
        if len > self.max_prompt_chars {
            tracing::warn!(len, max = self.max_prompt_chars, "instruction rejected");
            return Err(OperationError::PromptTooLong {
                len,
                max: self.max_prompt_chars,
            });
        }
        Ok(())
    }

    /// Length-check and recognize an instruction.
    pub fn parse(&self, prompt: &str) -> Result<Intent, OperationError> {
        self.check_prompt(prompt)?;
        Ok(CommandParser::parse(prompt))
    }

    pub fn execute(&self, grid: &Grid, overlay: &FormatOverlay, prompt: &str) -> OperationResult {
        self.execute_in(&Context::new(grid, overlay), prompt)
    }

    /// Run an instruction against a full context.
    pub fn execute_in(&self, ctx: &Context<'_>, prompt: &str) -> OperationResult {
        let intent = match self.parse(prompt) {
            Ok(intent) => intent,
            Err(err) => return OperationResult::failure(err),
        };

        if intent.is_unhandled() {
            tracing::debug!("no local intent matched");
            return OperationResult::failure(OperationError::Unhandled);
        }

        tracing::debug!(intent = intent.name(), "intent matched");
        builtins::call_builtin(ctx, &intent)
    }
}

/// Run one instruction with default limits.
pub fn execute(grid: &Grid, overlay: &FormatOverlay, prompt: &str) -> OperationResult {
    Interpreter::new().execute(grid, overlay, prompt)
}
