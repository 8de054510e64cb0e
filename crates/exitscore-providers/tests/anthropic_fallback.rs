//! The fallback chain against a stubbed Anthropic endpoint.

use std::sync::Arc;
use std::time::Duration;

use exitscore_core::traits::{NarrativeGenerator, NarrativeRequest};
use exitscore_providers::anthropic::AnthropicProvider;
use exitscore_providers::{ModelFallback, ProviderError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(model: &str) -> NarrativeRequest {
    NarrativeRequest {
        model: model.into(),
        prompt: "CATEGORY SCORES:\nCompany Growth: 80% (3/3 questions answered)".into(),
        system_prompt: None,
        max_tokens: 4000,
        temperature: 0.7,
    }
}

async fn mount_model(server: &MockServer, model: &str, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(serde_json::json!({ "model": model })))
        .respond_with(template)
        .mount(server)
        .await;
}

fn success(model: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "content": [{"type": "text", "text": "## Executive Snapshot"}],
        "model": model,
        "usage": {"input_tokens": 10, "output_tokens": 5}
    }))
}

fn chain(server: &MockServer) -> ModelFallback {
    let provider = AnthropicProvider::new("test-key", Some(server.uri())).unwrap();
    ModelFallback::new(Arc::new(provider))
        .with_fallback_models(vec![
            "claude-3-5-sonnet-20241022".into(),
            "claude-3-5-haiku-20241022".into(),
        ])
        .with_retry_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn retired_model_falls_back_to_next() {
    let server = MockServer::start().await;
    mount_model(&server, "claude-retired", ResponseTemplate::new(404)).await;
    mount_model(
        &server,
        "claude-3-5-sonnet-20241022",
        success("claude-3-5-sonnet-20241022"),
    )
    .await;

    let response = chain(&server).generate(&request("claude-retired")).await.unwrap();
    assert_eq!(response.model, "claude-3-5-sonnet-20241022");
    assert!(response.content.contains("Executive Snapshot"));
}

#[tokio::test]
async fn every_model_missing_reports_all_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = chain(&server).generate(&request("claude-retired")).await.unwrap_err();
    match err.downcast_ref::<ProviderError>() {
        Some(ProviderError::AllModelsFailed { tried, last_error }) => {
            assert_eq!(
                tried,
                &vec![
                    "claude-retired".to_string(),
                    "claude-3-5-sonnet-20241022".to_string(),
                    "claude-3-5-haiku-20241022".to_string(),
                ]
            );
            assert!(last_error.contains("claude-3-5-haiku-20241022"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn bad_key_stops_the_chain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .expect(1)
        .mount(&server)
        .await;

    let err = chain(&server).generate(&request("claude-retired")).await.unwrap_err();
    assert!(err.to_string().contains("authentication failed"));
}
