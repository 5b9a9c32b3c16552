//! LLM agent module: the single seam between the flows and the remote model.
//!
//! Uses rstructor's Gemini client for the real provider. Anything implementing
//! [`ModelClient`] can stand in for it.

use async_trait::async_trait;
use rstructor::{GeminiClient, GeminiModel, LLMClient};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// A remote generative model that turns a prompt into raw text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Gemini-backed model client.
pub struct GeminiAgent {
    client: GeminiClient,
}

impl GeminiAgent {
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?;
        let model = parse_gemini_model(&config.agent.model);

        let client = GeminiClient::new(api_key)
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?
            .model(model);

        Ok(Self { client })
    }
}

#[async_trait]
impl ModelClient for GeminiAgent {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        debug!(prompt_chars = prompt.len(), "sending prompt to gemini");
        let result = self
            .client
            .generate_with_metadata(prompt)
            .await
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;
        Ok(result.text)
    }
}

/// Decode a raw model reply into `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, AgentError> {
    let cleaned = strip_markdown_json(raw);
    serde_json::from_str(&cleaned).map_err(|e| AgentError::ParseError(format!("{}: {}", e, cleaned)))
}

/// Strip markdown code block wrappers from JSON response
fn strip_markdown_json(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // language tag: json, JSON, Json
        let without_prefix = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}

/// Parse a model string into a GeminiModel
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        other => {
            tracing::warn!(model = other, "unknown gemini model, using gemini-2.5-flash");
            GeminiModel::Gemini25Flash
        }
    }
}
