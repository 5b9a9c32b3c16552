//! The three prompt flows.
//!
//! Every flow runs the same pipeline: validate the request, render a prompt, make exactly one
//! model call under a timeout, decode the reply into the response type and validate it. Any
//! failure ends the call; nothing is retried or patched up.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::agent::{self, AgentError, GeminiAgent, ModelClient};
use crate::config::{Config, ConfigError};
use crate::prompt;
use crate::schema::{
    ArticleFetchRequest, ArticleFetchResponse, DigestRequest, DigestResponse, SummarizeRequest,
    SummarizeResponse, ValidationError,
};
use crate::scraper::{self, HttpFetcher, PageFetcher, ScraperError};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("article fetch failed: {0}")]
    Fetch(#[from] ScraperError),
    #[error("model call failed: {0}")]
    Upstream(String),
    #[error("model output does not match the expected schema: {0}")]
    SchemaViolation(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<AgentError> for FlowError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::ParseError(msg) => FlowError::SchemaViolation(msg),
            AgentError::ConfigError(e) => FlowError::Config(e),
            other => FlowError::Upstream(other.to_string()),
        }
    }
}

/// Runs the summarize, extract and digest flows against one model and one fetcher.
///
/// Holds no per-call state, so a single instance can serve concurrent callers.
pub struct Flows {
    model: Arc<dyn ModelClient>,
    fetcher: Arc<dyn PageFetcher>,
    config: Config,
    model_timeout: Duration,
}

impl Flows {
    pub fn new(model: Arc<dyn ModelClient>, fetcher: Arc<dyn PageFetcher>, config: Config) -> Self {
        Self {
            model,
            fetcher,
            model_timeout: config.model_timeout(),
            config,
        }
    }

    /// Override the per-call model timeout taken from `agent.timeout_secs`.
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Wire up the Gemini client and the HTTP fetcher from configuration.
    pub fn from_config(config: Config) -> Result<Self, FlowError> {
        let model = GeminiAgent::from_config(&config)?;
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Ok(Self::new(Arc::new(model), Arc::new(fetcher), config))
    }

    /// Summarize pre-supplied article text.
    ///
    /// Text longer than `summarize.max_input_chars` is cut off before prompting and the model
    /// is told so.
    pub async fn summarize_article(
        &self,
        req: &SummarizeRequest,
    ) -> Result<SummarizeResponse, FlowError> {
        req.validate()?;

        let text = req.article_content.trim();
        let limit = self.config.summarize.max_input_chars;
        let (article, truncated) = scraper::truncate_chars(text, limit);
        if truncated {
            warn!(
                chars = text.chars().count(),
                limit, "article exceeds input limit, truncating"
            );
        }
        info!(chars = article.chars().count(), "summarizing article");

        let prompt = prompt::summarize_prompt(&self.config.agent.persona, req, article, truncated);
        let response: SummarizeResponse = self.invoke(&prompt).await?;
        check_output(response.validate())?;
        Ok(response)
    }

    /// Fetch a page and have the model pull the article text out of its markup.
    pub async fn get_article_content(
        &self,
        req: &ArticleFetchRequest,
    ) -> Result<ArticleFetchResponse, FlowError> {
        let url = req.validate()?;
        info!(%url, "fetching article");

        let html = self.fetcher.fetch(&url).await?;
        let markup = scraper::reduce_markup(&html, self.config.fetch.max_markup_chars)?;
        info!(%url, page_chars = html.len(), markup_chars = markup.len(), "extracting article content");

        let prompt = prompt::extract_prompt(&self.config.agent.persona, url.as_str(), &markup);
        let response: ArticleFetchResponse = self.invoke(&prompt).await?;
        check_output(response.validate())?;
        Ok(response)
    }

    /// Produce a digest overview and article titles for the requested interests.
    ///
    /// The titles are invented by the model; there is no article corpus behind them.
    pub async fn generate_daily_digest(
        &self,
        req: &DigestRequest,
    ) -> Result<DigestResponse, FlowError> {
        req.validate()?;
        info!(
            interests = req.interests.len(),
            article_count = req.article_count,
            "generating daily digest"
        );

        let today = Local::now().date_naive();
        let prompt = prompt::digest_prompt(&self.config.agent.persona, req, today);
        let response: DigestResponse = self.invoke(&prompt).await?;
        check_output(response.validate(req.article_count))?;
        Ok(response)
    }

    /// One model call under the configured timeout, decoded into `T`.
    async fn invoke<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, FlowError> {
        let raw = tokio::time::timeout(self.model_timeout, self.model.generate(prompt))
            .await
            .map_err(|_| AgentError::Timeout(self.model_timeout))??;

        agent::decode(&raw).map_err(|e| {
            warn!(error = %e, "model reply rejected");
            FlowError::from(e)
        })
    }
}

fn check_output(result: Result<(), ValidationError>) -> Result<(), FlowError> {
    result.map_err(|e| {
        warn!(error = %e, "model reply rejected");
        FlowError::SchemaViolation(e.to_string())
    })
}
