//! OpenAI-Compatible Provider Implementation
//!
//! Speaks the `/chat/completions` dialect shared by OpenAI, OpenRouter,
//! Groq, Ollama's compatibility endpoint and most self-hosted gateways.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use super::LLMProvider;
use crate::core::llm::error::{LLMError, Result};
use crate::core::llm::types::{ChatMessage, ChatRequest, ChatResponse, TokenUsage};

/// Provider for any OpenAI-compatible chat-completions endpoint
pub struct OpenAICompatibleProvider {
    id: String,
    name: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    base_url: String,
    client: Client,
}

impl OpenAICompatibleProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LLMError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            id: "openai".to_string(),
            name: "OpenAI".to_string(),
            api_key,
            model,
            max_tokens: 1024,
            temperature: None,
            base_url,
            client,
        })
    }

    /// Default `max_tokens` when the request does not set one.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Default temperature when the request does not set one.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut messages: Vec<ChatMessage> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.extend(request.messages.iter().cloned());

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
        });

        if let Some(temp) = request.temperature.or(self.temperature) {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_body(&request);

        let start = Instant::now();
        let resp = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(
                provider = %self.id,
                status = status.as_u16(),
                "Chat completion rejected"
            );
            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthError(text),
                429 => LLMError::RateLimited,
                code => LLMError::ApiError {
                    status: code,
                    message: text,
                },
            });
        }

        let json: serde_json::Value = resp.json().await?;

        let choice = &json["choices"][0];
        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| LLMError::InvalidResponse("Missing content in response".to_string()))?
            .to_string();

        let usage = json["usage"].as_object().map(|u| TokenUsage {
            input_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            output_tokens: u
                .get("completion_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        });

        tracing::debug!(
            provider = %self.id,
            model = %self.model,
            latency_ms = latency,
            "Chat completion finished"
        );

        Ok(ChatResponse {
            content,
            model: json["model"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| self.model.clone()),
            provider: self.id.clone(),
            usage,
            finish_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
            latency_ms: latency,
        })
    }
}
