//! Text-generation provider implementations.

mod openai;

pub use openai::OpenAICompatibleProvider;

use async_trait::async_trait;

use super::error::Result;
use super::types::{ChatRequest, ChatResponse};

/// A chat-completion backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stable provider identifier (e.g. "openai").
    fn id(&self) -> &str;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Model used for completions.
    fn model(&self) -> &str;

    /// Cheap readiness check; does not hit the network.
    async fn health_check(&self) -> bool;

    /// Send a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
