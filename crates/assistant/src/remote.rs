//! The remote model seam and its HTTP implementation.

use crate::{AssistantConfig, AssistantError, Result};
use async_trait::async_trait;
use gridwise_core::{CellValue, Grid};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What is sent for an instruction no local command handled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteRequest {
    /// The instruction exactly as the user typed it.
    pub prompt: String,
    /// Profile-derived preamble plus the instruction.
    pub context: String,
    /// Row- and column-capped copy of the grid.
    pub data: Grid,
}

/// Reply from the remote model.
///
/// `result` is accepted in place of `message`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReply {
    #[serde(alias = "result")]
    pub message: String,
    #[serde(default)]
    pub data: Option<Vec<Vec<CellValue>>>,
    /// Grid row indexes to highlight.
    #[serde(default, alias = "highlight_rows")]
    pub highlight_rows: Option<Vec<usize>>,
}

#[async_trait]
pub trait RemoteAssistant: Send + Sync {
    async fn complete(&self, request: &RemoteRequest) -> Result<RemoteReply>;
}

/// JSON-over-HTTP remote model.
pub struct HttpAssistant {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAssistant {
    /// Client for `endpoint` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::Http` if building the underlying client fails.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| AssistantError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    /// Client for the configured endpoint, or `None` when none is set.
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>> {
        let Some(endpoint) = &config.endpoint else {
            return Ok(None);
        };
        let mut assistant = Self::new(endpoint.clone(), config.remote_timeout())?;
        assistant.api_key = config.api_key();
        Ok(Some(assistant))
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteAssistant for HttpAssistant {
    async fn complete(&self, request: &RemoteRequest) -> Result<RemoteReply> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AssistantError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<RemoteReply>()
            .await
            .map_err(|e| AssistantError::InvalidReply(e.to_string()))
    }
}
