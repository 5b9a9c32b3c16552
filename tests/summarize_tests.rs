mod common;

use common::{article_text, flows, flows_with, MockFetcher, MockModel};
use newsbrief::schema::MIN_ARTICLE_CHARS;
use newsbrief::{Config, FlowError, SummarizeRequest};

#[tokio::test]
async fn valid_article_gets_a_summary() {
    let model = MockModel::replying(r#"{"summary": "The council approved a 12 km light rail extension."}"#);
    let fetcher = MockFetcher::status(500);

    let resp = flows(&model, &fetcher)
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap();

    assert!(!resp.summary.is_empty());
    assert_eq!(model.calls(), 1);
    assert_eq!(fetcher.calls(), 0);
    assert!(model.last_prompt().unwrap().contains("light rail network"));
}

#[tokio::test]
async fn short_article_fails_before_calling_the_model() {
    let model = MockModel::replying(r#"{"summary": "unused"}"#);
    let fetcher = MockFetcher::status(500);

    let err = flows(&model, &fetcher)
        .summarize_article(&SummarizeRequest::new("short"))
        .await
        .unwrap_err();

    match err {
        FlowError::Validation(e) => assert_eq!(e.field, "articleContent"),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn whitespace_padding_does_not_count_towards_length() {
    let model = MockModel::replying(r#"{"summary": "unused"}"#);
    let padded = format!("{}short{}", " ".repeat(MIN_ARTICLE_CHARS), "\n".repeat(10));

    let err = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(padded))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::Validation(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn upstream_failure_is_not_retried() {
    let model = MockModel::failing("connection reset by peer");

    let err = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap_err();

    match err {
        FlowError::Upstream(msg) => assert!(msg.contains("connection reset")),
        other => panic!("expected an upstream error, got {other:?}"),
    }
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn missing_summary_field_is_a_schema_violation() {
    let model = MockModel::replying(r#"{"headline": "Rail expansion approved"}"#);

    let err = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::SchemaViolation(_)), "got {err:?}");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn blank_summary_is_a_schema_violation() {
    let model = MockModel::replying(r#"{"summary": "   "}"#);

    let err = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::SchemaViolation(_)), "got {err:?}");
}

#[tokio::test]
async fn non_json_reply_is_a_schema_violation() {
    let model = MockModel::replying("Here is your summary: the council approved it.");

    let err = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::SchemaViolation(_)), "got {err:?}");
}

#[tokio::test]
async fn fenced_json_reply_is_accepted() {
    let model = MockModel::replying("```json\n{\"summary\": \"Rail expansion approved.\"}\n```");

    let resp = flows(&model, &MockFetcher::status(500))
        .summarize_article(&SummarizeRequest::new(article_text()))
        .await
        .unwrap();

    assert_eq!(resp.summary, "Rail expansion approved.");
}

#[tokio::test]
async fn long_article_is_truncated_before_prompting() {
    let model = MockModel::replying(r#"{"summary": "Long piece."}"#);
    let mut config = Config::default();
    config.summarize.max_input_chars = 150;

    let long = format!("{}TAIL_MARKER", article_text().repeat(5));
    flows_with(&model, &MockFetcher::status(500), config)
        .summarize_article(&SummarizeRequest::new(long))
        .await
        .unwrap();

    let prompt = model.last_prompt().unwrap();
    assert!(!prompt.contains("TAIL_MARKER"));
    assert!(prompt.contains("cut off"));
}

#[tokio::test]
async fn source_url_is_passed_to_the_prompt() {
    let model = MockModel::replying(r#"{"summary": "ok"}"#);
    let req = SummarizeRequest::new(article_text()).with_url("https://news.example/rail");

    flows(&model, &MockFetcher::status(500))
        .summarize_article(&req)
        .await
        .unwrap();

    assert!(model.last_prompt().unwrap().contains("Source: https://news.example/rail"));
}
