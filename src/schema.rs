//! Request and response records for the three flows.
//!
//! Requests are checked with an explicit `validate()` before anything leaves the process.
//! Responses derive `JsonSchema` so the expected shape can be spelled out to the model, and
//! are checked again with `validate()` after decoding.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Shortest article text worth summarizing, in characters.
pub const MIN_ARTICLE_CHARS: usize = 100;

/// Digest size used when a request omits `articleCount`.
pub const DEFAULT_ARTICLE_COUNT: u32 = 5;

/// Largest digest a caller may ask for.
pub const MAX_ARTICLE_COUNT: u32 = 20;

/// A request or response field that failed its checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid `{field}`: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A selectable digest interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
}

/// Interests offered to users picking a digest.
pub const DIGEST_TOPICS: &[Topic] = &[
    Topic { id: "machine learning", label: "Machine Learning" },
    Topic { id: "neural networks", label: "Neural Networks" },
    Topic { id: "computer vision", label: "Computer Vision" },
    Topic { id: "natural language processing", label: "Natural Language Processing (NLP)" },
    Topic { id: "robotics", label: "Robotics" },
    Topic { id: "ethical ai", label: "Ethical AI" },
    Topic { id: "generative ai", label: "Generative AI" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Full text of the article to summarize
    pub article_content: String,
    /// Where the text came from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
}

impl SummarizeRequest {
    pub fn new(article_content: impl Into<String>) -> Self {
        Self {
            article_content: article_content.into(),
            article_url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.article_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let chars = self.article_content.trim().chars().count();
        if chars == 0 {
            return Err(ValidationError::new("articleContent", "must not be empty"));
        }
        if chars < MIN_ARTICLE_CHARS {
            return Err(ValidationError::new(
                "articleContent",
                format!("must be at least {MIN_ARTICLE_CHARS} characters, got {chars}"),
            ));
        }
        if let Some(url) = &self.article_url {
            check_url("articleUrl", url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    /// A concise, faithful summary of the article in a few short paragraphs
    pub summary: String,
}

impl SummarizeResponse {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_blank("summary", &self.summary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFetchRequest {
    /// Absolute http(s) URL of the article page
    pub url: String,
}

impl ArticleFetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Validate and return the parsed URL.
    pub fn validate(&self) -> Result<Url, ValidationError> {
        check_url("url", &self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFetchResponse {
    /// The main body text of the article, without navigation, ads, headers or footers
    pub article_content: String,
}

impl ArticleFetchResponse {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_blank("articleContent", &self.article_content)
    }
}

/// Topics to build a daily digest around.
///
/// There is no article corpus behind a digest: the model writes the overview and invents
/// plausible article titles for the interests. Made-up titles are expected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestRequest {
    pub interests: Vec<String>,
    #[serde(default = "default_article_count")]
    pub article_count: u32,
}

fn default_article_count() -> u32 {
    DEFAULT_ARTICLE_COUNT
}

impl DigestRequest {
    pub fn new<I, S>(interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
            article_count: DEFAULT_ARTICLE_COUNT,
        }
    }

    pub fn with_article_count(mut self, count: u32) -> Self {
        self.article_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interests.is_empty() {
            return Err(ValidationError::new(
                "interests",
                "at least one interest is required",
            ));
        }
        if let Some(pos) = self.interests.iter().position(|i| i.trim().is_empty()) {
            return Err(ValidationError::new(
                "interests",
                format!("entry {pos} is blank"),
            ));
        }
        if !(1..=MAX_ARTICLE_COUNT).contains(&self.article_count) {
            return Err(ValidationError::new(
                "articleCount",
                format!(
                    "must be between 1 and {MAX_ARTICLE_COUNT}, got {}",
                    self.article_count
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DigestResponse {
    /// A concise overview of the main AI news stories, tailored to the reader's interests
    pub summary: String,
    /// Titles of the articles covered by the overview
    pub articles: Vec<String>,
}

impl DigestResponse {
    /// Check the decoded digest against the request that produced it.
    pub fn validate(&self, article_count: u32) -> Result<(), ValidationError> {
        non_blank("summary", &self.summary)?;
        if self.articles.len() > article_count as usize {
            return Err(ValidationError::new(
                "articles",
                format!(
                    "expected at most {article_count} titles, got {}",
                    self.articles.len()
                ),
            ));
        }
        if self.articles.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::new("articles", "contains a blank title"));
        }
        Ok(())
    }
}

fn non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn check_url(field: &'static str, raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ValidationError::new(field, format!("not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(ValidationError::new(field, "URL has no host")),
        other => Err(ValidationError::new(
            field,
            format!("unsupported scheme `{other}`"),
        )),
    }
}
