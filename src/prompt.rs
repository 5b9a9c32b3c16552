//! Prompt templates for the three flows.
//!
//! Each builder takes the already-validated request and returns the full prompt text,
//! ending with the JSON schema the model has to answer in.

use chrono::NaiveDate;
use schemars::JsonSchema;

use crate::schema::{
    ArticleFetchResponse, DigestRequest, DigestResponse, SummarizeRequest, SummarizeResponse,
};

const JSON_ONLY: &str = "Do not include any markdown formatting, code blocks, or explanations. \
Only output the raw JSON object.";

/// Render the output contract for `T` as a prompt section.
fn output_contract<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());
    format!("You MUST respond with valid JSON matching this JSON schema:\n{schema_json}\n\n{JSON_ONLY}")
}

/// Summarize pre-supplied article text.
///
/// `truncated` tells the model it is only seeing the beginning of the article.
pub fn summarize_prompt(persona: &str, req: &SummarizeRequest, article: &str, truncated: bool) -> String {
    let source = req
        .article_url
        .as_deref()
        .map(|u| format!("Source: {}\n", u.trim()))
        .unwrap_or_default();
    let truncation_note = if truncated {
        "\nNote: the article was too long and has been cut off. Summarize what is given and do not guess at the rest.\n"
    } else {
        ""
    };

    format!(
        r#"{persona}

Summarize the following news article. Capture the main event, the key facts and figures, who is involved, and why it matters. Stay faithful to the text and do not add information that is not in it.
{truncation_note}
{contract}

---
{source}
{article}"#,
        contract = output_contract::<SummarizeResponse>(),
    )
}

/// Extract the main article text from reduced page markup.
pub fn extract_prompt(persona: &str, url: &str, markup: &str) -> String {
    format!(
        r#"{persona}

Extract the main text content of the news article from the HTML below, removing all boilerplate like headers, footers, ads, navigation, cookie notices, and related-article links. Keep the article's paragraphs in their original order and wording, as plain text separated by blank lines.

{contract}

---
URL: {url}

{markup}"#,
        contract = output_contract::<ArticleFetchResponse>(),
    )
}

/// Build a daily digest around the requested interests.
pub fn digest_prompt(persona: &str, req: &DigestRequest, today: NaiveDate) -> String {
    let interests = req
        .interests
        .iter()
        .map(|i| format!("- {}", i.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{persona}

You are an AI news aggregator that provides a daily digest of AI-related news articles for {date}.

The user is interested in the following topics:
{interests}

Please provide a summary of the top {count} articles, and a list of summarized article titles. Focus on delivering the most impactful and relevant information to the user.

summary: A concise overview of the main AI news stories, tailored to the user's interests.
articles: The titles of the articles that were summarized, at most {count} of them.

{contract}"#,
        date = today.format("%B %-d, %Y"),
        count = req.article_count,
        contract = output_contract::<DigestResponse>(),
    )
}
