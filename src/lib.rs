//! # Newsbrief
//!
//! Prompt flows for a news reader backed by a hosted LLM.
//!
//! ## Flows
//!
//! - **Summarize**: article text in, summary out
//! - **Extract**: URL in, main article text out (the page is fetched here, the model only reads markup)
//! - **Digest**: interests in, an overview plus a list of model-invented article titles out
//!
//! Each flow validates its request, makes one model call through [`agent::ModelClient`] and
//! validates the reply before returning it.

pub mod agent;
pub mod config;
pub mod flow;
pub mod logging;
pub mod prompt;
pub mod schema;
pub mod scraper;

pub use config::Config;
pub use flow::{FlowError, Flows};
pub use schema::{
    ArticleFetchRequest, ArticleFetchResponse, DigestRequest, DigestResponse, SummarizeRequest,
    SummarizeResponse, ValidationError,
};
