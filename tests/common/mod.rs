//! Shared test doubles for the flow tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use newsbrief::agent::{AgentError, ModelClient};
use newsbrief::scraper::{PageFetcher, ScraperError};
use newsbrief::{Config, Flows};
use url::Url;

/// What the mock model does when called.
pub enum Reply {
    Text(String),
    Fail(String),
    Hang(Duration),
}

/// Model client that records prompts and answers with a canned reply.
pub struct MockModel {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Self::with(Reply::Text(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Self::with(Reply::Fail(message.into()))
    }

    pub fn hanging(delay: Duration) -> Arc<Self> {
        Self::with(Reply::Hang(delay))
    }

    fn with(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(AgentError::RequestFailed(message.clone())),
            Reply::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("{}".to_string())
            }
        }
    }
}

/// Fetcher that serves one page body or one HTTP status.
pub struct MockFetcher {
    page: Result<String, u16>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn serving(html: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            page: Ok(html.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            page: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.page {
            Ok(html) => Ok(html.clone()),
            Err(status) => Err(ScraperError::Status {
                url: url.to_string(),
                status: *status,
            }),
        }
    }
}

pub fn flows(model: &Arc<MockModel>, fetcher: &Arc<MockFetcher>) -> Flows {
    flows_with(model, fetcher, Config::default())
}

pub fn flows_with(model: &Arc<MockModel>, fetcher: &Arc<MockFetcher>, config: Config) -> Flows {
    Flows::new(model.clone(), fetcher.clone(), config)
}

/// Article text comfortably above the minimum length.
pub fn article_text() -> String {
    "The city council voted on Tuesday to expand the light rail network by twelve kilometres, \
     adding six stations in the northern districts. Construction is expected to begin next \
     spring and to finish within four years, according to the transport department."
        .to_string()
}
