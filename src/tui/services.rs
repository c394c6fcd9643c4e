use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::llm::{LLMProvider, OpenAICompatibleProvider};
use crate::core::suggestion::{suggest_post_match_message, SuggestionError, SuggestionInput};

use super::events::AppEvent;

/// Centralized handle to the backend services.
///
/// Created once at startup and owned by the app state. The suggestion
/// provider is optional: without an API key the wizard still works and
/// suggestion requests are refused with a notification.
pub struct Services {
    pub llm: Option<Arc<dyn LLMProvider>>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn new(
        llm: Option<Arc<dyn LLMProvider>>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self { llm, event_tx }
    }

    /// Initialize services from config.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = &config.suggestion;

        let llm: Option<Arc<dyn LLMProvider>> = if !settings.enabled {
            log::info!("Message suggestion disabled in config");
            None
        } else if let Some(api_key) = settings.api_key() {
            let provider = OpenAICompatibleProvider::new(
                api_key,
                settings.model.clone(),
                settings.base_url.clone(),
                settings.timeout(),
            )?
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature);
            log::info!(
                "Message suggestion via {} ({})",
                settings.base_url,
                settings.model
            );
            Some(Arc::new(provider) as Arc<dyn LLMProvider>)
        } else {
            log::warn!(
                "{} is not set; message suggestion unavailable",
                settings.api_key_env
            );
            None
        };

        Ok(Self::new(llm, event_tx))
    }

    pub fn suggestion_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Spawn a suggestion request; the outcome arrives as an [`AppEvent`]
    /// tagged with `request_id`.
    pub fn request_suggestion(
        &self,
        request_id: u64,
        input: SuggestionInput,
    ) -> Result<(), SuggestionError> {
        let llm = self.llm.clone().ok_or(SuggestionError::NotConfigured)?;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match suggest_post_match_message(llm.as_ref(), &input).await {
                Ok(message) => AppEvent::SuggestionReady {
                    request_id,
                    message,
                },
                Err(e) => {
                    log::warn!("Suggestion request {request_id} failed: {e}");
                    AppEvent::SuggestionFailed {
                        request_id,
                        error: e.user_message().to_string(),
                    }
                }
            };
            // Receiver gone means the app is shutting down.
            let _ = tx.send(event);
        });

        Ok(())
    }
}
