//! Web scraping module for article fetching.
//!
//! Uses reqwest for fetching and scraper for trimming the page markup down to the part that
//! is likely to hold the article before it is handed to the model.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// User-Agent string identifying this scraper
const USER_AGENT: &str = concat!("newsbrief/", env!("CARGO_PKG_VERSION"));

/// Elements that never carry article text, wherever they appear
const NOISE: &str = "script, style, noscript, template, form, svg, iframe";

/// Chrome that can sit inside an article container. Its own header and footer hold the
/// headline and byline, so those stay.
const REGION_CHROME: &str = "nav, aside";

/// Page-level chrome, stripped only when no article container is found
const PAGE_CHROME: &str = "nav, header, footer, aside";

/// Likely article containers, most specific first
const MAIN_SELECTORS: [&str; 5] = ["article", "main", "[role='main']", ".content", "#content"];

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("no content found at URL")]
    NoContent,
}

/// Source of raw page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the body. Any non-2xx status is an error.
    async fn fetch(&self, url: &Url) -> Result<String, ScraperError>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ScraperError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Reduce a full HTML page to the markup of its main content.
///
/// Keeps the first non-empty article container minus its navigation and asides, falling back
/// to `<body>` without the page's header, footer and navigation. The result is cut to at most
/// `max_chars` characters.
pub fn reduce_markup(html: &str, max_chars: usize) -> Result<String, ScraperError> {
    let mut document = Html::parse_document(html);
    strip(&mut document, NOISE);

    let markup = main_region(&document)
        .and_then(|region| {
            let mut fragment = Html::parse_fragment(&region);
            strip(&mut fragment, REGION_CHROME);
            let root = fragment.root_element();
            let has_text = root.text().any(|t| !t.trim().is_empty());
            let inner = has_text.then(|| root.inner_html());
            inner
        })
        .or_else(|| {
            strip(&mut document, PAGE_CHROME);
            non_empty_html(&document, "body")
        })
        .ok_or(ScraperError::NoContent)?;

    let collapsed = collapse_blank_lines(&markup);
    if collapsed.is_empty() {
        return Err(ScraperError::NoContent);
    }
    let (bounded, truncated) = truncate_chars(&collapsed, max_chars);
    if truncated {
        debug!(max_chars, "page markup truncated");
    }
    Ok(bounded.to_string())
}

/// Detach every element matching `css`
fn strip(document: &mut Html, css: &str) {
    let Ok(selector) = Selector::parse(css) else {
        return;
    };
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn main_region(document: &Html) -> Option<String> {
    MAIN_SELECTORS
        .iter()
        .find_map(|sel| non_empty_html(document, sel))
}

/// Markup of the first element matching `sel` that has any text in it
fn non_empty_html(document: &Html, sel: &str) -> Option<String> {
    let selector = Selector::parse(sel).ok()?;
    document
        .select(&selector)
        .find(|el| el.text().any(|t| !t.trim().is_empty()))
        .map(|el| el.html())
}

fn collapse_blank_lines(markup: &str) -> String {
    markup
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}
