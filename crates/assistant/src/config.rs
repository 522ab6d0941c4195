//! Assistant configuration, read from YAML.

use crate::{AssistantError, Result};
use gridwise_core::MAX_PROMPT_CHARS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for the remote fallback.
///
/// Every field has a default, so an empty document is a valid config.
///
/// ```
/// use gridwise_assistant::AssistantConfig;
///
/// let config = AssistantConfig::from_yaml_str("remote_max_rows: 50\nquota: 3\n").unwrap();
/// assert_eq!(config.remote_max_rows, 50);
/// assert_eq!(config.remote_max_cols, 20);
/// assert_eq!(config.quota, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Remote model URL. Without one every forwarded instruction fails over.
    pub endpoint: Option<String>,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    pub remote_timeout_secs: u64,
    pub remote_max_rows: usize,
    pub remote_max_cols: usize,
    pub max_prompt_chars: usize,
    /// Remote calls allowed per process; unlimited when absent.
    pub quota: Option<usize>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "GRIDWISE_API_KEY".to_string(),
            remote_timeout_secs: 30,
            remote_max_rows: 100,
            remote_max_cols: 20,
            max_prompt_chars: MAX_PROMPT_CHARS,
            quota: None,
        }
    }
}

impl AssistantConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document parses as null, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| AssistantError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AssistantError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Bearer token from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
