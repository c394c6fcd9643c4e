//! LLM Client Module
//!
//! Minimal interface to a text-generation service, used to draft a
//! post-match message.
//!
//! # Module Structure
//!
//! - `types`: chat messages, requests and responses
//! - `error`: [`LLMError`] and the module `Result` alias
//! - `providers`: the [`LLMProvider`] trait and its implementations

mod error;
mod types;
pub mod providers;

pub use error::{LLMError, Result};
pub use providers::*;
pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole, TokenUsage};
