//! Configuration loading and management for newsbrief.
//!
//! Loads settings from `newsbrief.toml` with environment variable overrides for sensitive data.
//! Every section has defaults, so running without a config file is fine as long as an API key
//! is available from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "newsbrief.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
    #[error("unsupported LLM provider: {0}")]
    UnsupportedProvider(String),
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// LLM provider, currently only "gemini"
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    /// System persona prepended to every prompt
    pub persona: String,
    /// Upper bound on a single model call
    pub timeout_secs: u64,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
}

/// Article fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Reduced page markup beyond this many characters is cut off before prompting
    pub max_markup_chars: usize,
}

/// Summarization input policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    /// Article text beyond this many characters is truncated before prompting
    pub max_input_chars: usize,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub summarize: SummarizeConfig,
}

impl Config {
    /// Load configuration from the default location (newsbrief.toml in cwd or home).
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Self::find_config_file().as_deref(), env_var)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_sources(Some(path), env_var)
    }

    /// Build a config from an optional file plus key overrides looked up through `lookup`.
    fn from_sources(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: Config = match path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        config.apply_key_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Override API keys from environment-style variables
    fn apply_key_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // GEMINI_API_KEY wins over GOOGLE_API_KEY when both are set
        for var in ["GOOGLE_API_KEY", "GEMINI_API_KEY"] {
            if let Some(key) = lookup(var) {
                if !key.trim().is_empty() {
                    self.api.gemini_key = Some(key);
                }
            }
        }
    }

    /// Reject settings that would make every call fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("agent.timeout_secs", self.agent.timeout_secs as usize),
            ("fetch.timeout_secs", self.fetch.timeout_secs as usize),
            ("fetch.max_markup_chars", self.fetch.max_markup_chars),
            ("summarize.max_input_chars", self.summarize.max_input_chars),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("newsbrief")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the configured provider
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.agent.provider.as_str() {
            "gemini" => self
                .api
                .gemini_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string())),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.agent.timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            persona: "You are a careful news editor who writes accurate, neutral, concise prose."
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_markup_chars: 120_000,
        }
    }
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 48_000,
        }
    }
}
