//! Post-Match Suggestion Tests
//!
//! Drives `suggest_post_match_message` against a mocked provider and, end to
//! end, against the OpenAI-compatible provider on a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::bo3::{CardClass, GameOutcome, GameResult, MatchRecord, TurnOrder};
use crate::core::llm::{
    ChatResponse, LLMError, MessageRole, MockLLMProvider, OpenAICompatibleProvider,
};
use crate::core::suggestion::{
    build_prompt, suggest_post_match_message, SuggestionError, SuggestionInput,
};

fn straight_loss() -> MatchRecord {
    let mut record = MatchRecord::new();
    record.round_label = "4".to_string();
    record.games[0] = Some(
        GameOutcome::new(CardClass::Nightmare, CardClass::Bishop, TurnOrder::Second, GameResult::Loss)
            .with_memo("missed land"),
    );
    record.games[1] = Some(GameOutcome::new(
        CardClass::Nemesis,
        CardClass::Dragon,
        TurnOrder::First,
        GameResult::Loss,
    ));
    record.refresh_overall_result();
    record
}

fn response(content: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_string(),
        model: "test-model".to_string(),
        provider: "mock".to_string(),
        usage: None,
        finish_reason: Some("stop".to_string()),
        latency_ms: 3,
    }
}

// =============================================================================
// Mocked Provider
// =============================================================================

#[tokio::test]
async fn test_request_carries_system_and_prompt() {
    let input = SuggestionInput::try_from(&straight_loss()).unwrap();
    let expected_prompt = build_prompt(&input);

    let mut provider = MockLLMProvider::new();
    provider
        .expect_chat()
        .withf(move |request| {
            request.messages.len() == 1
                && request.messages[0].role == MessageRole::User
                && request.messages[0].content == expected_prompt
                && request
                    .system_prompt
                    .as_deref()
                    .is_some_and(|s| s.contains("post-match message"))
        })
        .times(1)
        .returning(|_| Ok(response("  Well played, good luck next round!  ")));

    let message = suggest_post_match_message(&provider, &input).await.unwrap();
    assert_eq!(message, "Well played, good luck next round!");
}

#[test]
fn test_prompt_for_loss_without_opponent() {
    let input = SuggestionInput::try_from(&straight_loss()).unwrap();
    let prompt = build_prompt(&input);

    assert!(prompt.starts_with("Match Result: loss\n"));
    assert!(prompt.contains("Opponent Name: Unknown Opponent\n"));
    assert!(prompt.contains("User Notes: missed land\n"));
    assert_eq!(prompt.matches("- User Class: ").count(), 2);
}

#[tokio::test]
async fn test_blank_reply_is_empty_response() {
    let input = SuggestionInput::try_from(&straight_loss()).unwrap();

    let mut provider = MockLLMProvider::new();
    provider
        .expect_chat()
        .returning(|_| Ok(response(" \n ")));

    let err = suggest_post_match_message(&provider, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::EmptyResponse));
    assert_eq!(err.user_message(), "メッセージの提案に失敗しました。");
}

#[tokio::test]
async fn test_provider_failure_is_wrapped() {
    let input = SuggestionInput::try_from(&straight_loss()).unwrap();

    let mut provider = MockLLMProvider::new();
    provider
        .expect_chat()
        .returning(|_| Err(LLMError::RateLimited));

    let err = suggest_post_match_message(&provider, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::Provider(LLMError::RateLimited)));
    assert_eq!(err.user_message(), "メッセージの提案に失敗しました。");
}

#[test]
fn test_not_configured_message() {
    assert_eq!(
        SuggestionError::NotConfigured.user_message(),
        "メッセージ提案のAPIキーが設定されていません。"
    );
}

// =============================================================================
// End to End over HTTP
// =============================================================================

#[tokio::test]
async fn test_suggestion_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": "ありがとうございました！\n" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAICompatibleProvider::new(
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
        server.uri(),
        Duration::from_secs(5),
    )
    .unwrap();

    let input = SuggestionInput::try_from(&straight_loss()).unwrap();
    let message = suggest_post_match_message(&provider, &input).await.unwrap();
    assert_eq!(message, "ありがとうございました！");
}

#[tokio::test]
async fn test_http_error_surfaces_as_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let provider = OpenAICompatibleProvider::new(
        "sk-wrong".to_string(),
        "gpt-4o-mini".to_string(),
        server.uri(),
        Duration::from_secs(5),
    )
    .unwrap();

    let input = SuggestionInput::try_from(&straight_loss()).unwrap();
    let err = suggest_post_match_message(&provider, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::Provider(LLMError::AuthError(_))));
}
