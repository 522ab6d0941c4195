//! # gridwise-assistant
//!
//! Fallback for instructions the local interpreter does not recognize.
//!
//! [`Assistant::handle`] always tries the local interpreter first. Only an
//! unhandled instruction reaches the [`EntitlementGate`] and then the
//! [`RemoteAssistant`], which receives a capped copy of the grid and a
//! profile-derived context preamble. When the remote call fails, a
//! highlight request still gets the default red highlight locally.

use gridwise_core::{
    CellFormat, CellRef, FormatOverlay, Grid, HighlightColor, OperationError, OperationResult,
};
use gridwise_interpreter::{Context, Interpreter, Session};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod config;
pub mod gate;
pub mod remote;

pub use config::AssistantConfig;
pub use gate::{AllowAll, Entitlement, EntitlementGate, QuotaGate};
pub use remote::{HttpAssistant, RemoteAssistant, RemoteReply, RemoteRequest};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {code} - {reason}")]
    Status { code: u16, reason: String },

    #[error("Invalid reply from the AI assistant: {0}")]
    InvalidReply(String),

    #[error("The AI assistant did not answer within {0} seconds")]
    Timeout(u64),

    #[error("No AI assistant endpoint is configured")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Local interpreter plus the gated remote fallback.
pub struct Assistant {
    interpreter: Interpreter,
    config: AssistantConfig,
    gate: Arc<dyn EntitlementGate>,
    remote: Option<Arc<dyn RemoteAssistant>>,
}

impl Assistant {
    /// Assistant with no remote model. A configured quota becomes a [`QuotaGate`].
    pub fn new(config: AssistantConfig) -> Self {
        let gate: Arc<dyn EntitlementGate> = match config.quota {
            Some(limit) => Arc::new(QuotaGate::new(limit)),
            None => Arc::new(AllowAll),
        };
        Self {
            interpreter: Interpreter::new().with_max_prompt_chars(config.max_prompt_chars),
            config,
            gate,
            remote: None,
        }
    }

    /// Assistant wired to the configured HTTP endpoint, if any.
    pub fn from_config(config: AssistantConfig) -> Result<Self> {
        let remote = HttpAssistant::from_config(&config)?;
        let assistant = Self::new(config);
        Ok(match remote {
            Some(remote) => assistant.with_remote(remote),
            None => assistant,
        })
    }

    #[must_use]
    pub fn with_gate(mut self, gate: impl EntitlementGate + 'static) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: impl RemoteAssistant + 'static) -> Self {
        self.remote = Some(Arc::new(remote));
        self
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run an instruction locally, forwarding it only when nothing matched.
    pub async fn handle(&self, ctx: &Context<'_>, prompt: &str) -> OperationResult {
        let local = self.interpreter.execute_in(ctx, prompt);
        if !local.is_unhandled() {
            return local;
        }

        if let Entitlement::Denied(message) = self.gate.check().await {
            warn!("remote fallback denied by entitlement gate");
            return OperationResult::failure(OperationError::QuotaExceeded(message));
        }

        info!("forwarding instruction to the AI assistant");
        match self.forward(ctx, prompt).await {
            Ok(reply) => normalize(ctx, reply),
            Err(err) => recover(ctx, prompt, &err),
        }
    }

    /// [`handle`](Self::handle) against a session, adopting the result.
    pub async fn run(&self, session: &mut Session, prompt: &str) -> OperationResult {
        let result = self.handle(&session.context(), prompt).await;
        session.apply(&result);
        result
    }

    /// Build the capped request and call the remote model under the timeout.
    async fn forward(&self, ctx: &Context<'_>, prompt: &str) -> Result<RemoteReply> {
        let remote = self.remote.as_ref().ok_or(AssistantError::NotConfigured)?;
        let request = self.request(ctx.grid, prompt);

        tokio::time::timeout(self.config.remote_timeout(), remote.complete(&request))
            .await
            .map_err(|_| AssistantError::Timeout(self.config.remote_timeout_secs))?
    }

    pub fn request(&self, grid: &Grid, prompt: &str) -> RemoteRequest {
        let context = match gridwise_profiler::profile(grid) {
            Ok(structure) => gridwise_profiler::suggest::enhance_prompt(prompt, &structure),
            Err(_) => prompt.trim().to_string(),
        };
        RemoteRequest {
            prompt: prompt.to_string(),
            context,
            data: grid.truncated(self.config.remote_max_rows, self.config.remote_max_cols),
        }
    }
}

/// Red highlight across every column of the given grid rows.
fn red_rows(grid: &Grid, rows: impl IntoIterator<Item = usize>) -> FormatOverlay {
    let format = CellFormat::highlight(HighlightColor::Red);
    let mut overlay = FormatOverlay::new();
    for row in rows.into_iter().filter(|&r| r < grid.row_count()) {
        for col in 0..grid.col_count() {
            overlay.apply(CellRef::new(row, col), &format);
        }
    }
    overlay
}

/// Turn a remote reply into the same result shape local commands produce.
fn normalize(ctx: &Context<'_>, reply: RemoteReply) -> OperationResult {
    let RemoteReply {
        message,
        data,
        highlight_rows,
    } = reply;

    let mut result = match data {
        Some(rows) if !rows.is_empty() => OperationResult::with_grid(message, Grid::new(rows)),
        _ => OperationResult::message(message),
    };

    if let Some(rows) = highlight_rows.filter(|rows| !rows.is_empty()) {
        let overlay = match &result.new_grid {
            Some(grid) => red_rows(grid, rows),
            None => ctx.overlay.merged(&red_rows(ctx.grid, rows)),
        };
        result.format_overlay = Some(overlay);
    }
    result
}

/// Remote failure: highlight requests fall back to red data rows, the rest
/// surface the error.
fn recover(ctx: &Context<'_>, prompt: &str, err: &AssistantError) -> OperationResult {
    warn!(error = %err, "AI assistant request failed");
    let failure = OperationError::RemoteService(err.to_string());

    if !prompt.to_lowercase().contains("highlight") {
        return OperationResult::failure(failure);
    }

    let rows = 1..ctx.grid.row_count();
    let count = rows.len();
    let overlay = ctx.overlay.merged(&red_rows(ctx.grid, rows));
    let mut result = OperationResult::with_overlay(
        format!("{failure}. Highlighted all {count} data rows in red instead"),
        overlay,
    );
    result.error = Some(failure);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::from_data(vec![vec!["Name", "N"], vec!["a", "1"], vec!["b", "2"]])
    }

    #[test]
    fn test_recover_highlights_data_rows() {
        let grid = grid();
        let overlay = FormatOverlay::new();
        let ctx = Context::new(&grid, &overlay);
        let result = recover(&ctx, "Highlight the outliers", &AssistantError::NotConfigured);

        assert_eq!(result.error.as_ref().map(OperationError::kind), Some("remote_service"));
        assert!(result.message.contains("No AI assistant endpoint is configured"));
        let overlay = result.format_overlay.unwrap();
        assert_eq!(overlay.formatted_rows().into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(overlay.len(), 4);
    }

    #[test]
    fn test_recover_without_highlight() {
        let grid = grid();
        let overlay = FormatOverlay::new();
        let ctx = Context::new(&grid, &overlay);
        let result = recover(&ctx, "forecast sales", &AssistantError::Timeout(30));
        assert!(result.format_overlay.is_none());
        assert_eq!(
            result.message,
            "Remote service error: The AI assistant did not answer within 30 seconds"
        );
    }

    #[test]
    fn test_normalize_highlight_rows_merge() {
        let grid = grid();
        let mut overlay = FormatOverlay::new();
        overlay.apply(CellRef::new(0, 0), &CellFormat::bold());
        let ctx = Context::new(&grid, &overlay);

        let reply = RemoteReply {
            message: "Flagged one row".into(),
            data: None,
            highlight_rows: Some(vec![2, 99]),
        };
        let result = normalize(&ctx, reply);
        let overlay = result.format_overlay.unwrap();
        assert!(overlay.get(CellRef::new(0, 0)).is_some());
        assert!(overlay.get(CellRef::new(2, 1)).is_some());
        assert_eq!(overlay.len(), 3);
    }
}
