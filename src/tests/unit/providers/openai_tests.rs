//! OpenAI-Compatible Provider Unit Tests
//!
//! Tests for the chat-completions provider against a mock HTTP server:
//! - Request formatting (path, bearer auth, body)
//! - Response parsing
//! - Error mapping (auth, rate limits, API errors, malformed bodies)
//! - Custom base URL support

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::{
    ChatMessage, ChatRequest, LLMError, LLMProvider, OpenAICompatibleProvider, TokenUsage,
};

fn provider(base_url: String) -> OpenAICompatibleProvider {
    OpenAICompatibleProvider::new(
        "sk-test-key".to_string(),
        "gpt-4o-mini".to_string(),
        base_url,
        Duration::from_secs(5),
    )
    .expect("client builds")
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Match Result: win")]).with_system("be brief")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
    })
}

// =============================================================================
// Provider Identity Tests
// =============================================================================

#[test]
fn test_provider_identity() {
    let provider = provider("https://api.openai.com/v1".to_string());
    assert_eq!(provider.id(), "openai");
    assert_eq!(provider.name(), "OpenAI");
    assert_eq!(provider.model(), "gpt-4o-mini");
}

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_chat_parses_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "Match Result: win" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("GG, thanks!")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(server.uri()).chat(request()).await.unwrap();

    assert_eq!(response.content, "GG, thanks!");
    assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(
        response.usage,
        Some(TokenUsage {
            input_tokens: 42,
            output_tokens: 7,
        })
    );
}

#[tokio::test]
async fn test_chat_sends_configured_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "max_tokens": 400 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    // Trailing slash on the base URL is tolerated
    let provider = provider(format!("{}/", server.uri())).with_max_tokens(400);
    let response = provider.chat(request()).await.unwrap();
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn test_chat_without_usage_or_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "hi" } }]
        })))
        .mount(&server)
        .await;

    let response = provider(server.uri()).chat(request()).await.unwrap();
    assert_eq!(response.content, "hi");
    assert_eq!(response.model, "gpt-4o-mini");
    assert!(response.usage.is_none());
    assert!(response.finish_reason.is_none());
}

// =============================================================================
// Error Mapping
// =============================================================================

async fn chat_with_status(status: u16, body: &str) -> LLMError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    provider(server.uri())
        .chat(request())
        .await
        .expect_err("non-2xx status must fail")
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let err = chat_with_status(401, "invalid api key").await;
    assert!(matches!(err, LLMError::AuthError(ref msg) if msg == "invalid api key"));
}

#[tokio::test]
async fn test_forbidden_maps_to_auth_error() {
    let err = chat_with_status(403, "forbidden").await;
    assert!(matches!(err, LLMError::AuthError(_)));
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limited() {
    let err = chat_with_status(429, "slow down").await;
    assert!(matches!(err, LLMError::RateLimited));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let err = chat_with_status(500, "upstream exploded").await;
    match err {
        LLMError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_content_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = provider(server.uri()).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = provider(server.uri()).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}
