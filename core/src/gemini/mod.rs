//! AI collaborator
//!
//! [`AiProvider`] is the seam between the application and the model API.
//! [`GeminiClient`] implements it over the Gemini REST API; tests substitute
//! scripted providers.

pub mod client;
mod sse;
pub mod types;

pub use client::GeminiClient;

use crate::chat::ChatMessage;
use crate::error::ProviderError;
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

/// Stream of reply fragments in arrival order
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// A chat conversation as seen by the provider
///
/// Holds everything needed to continue the conversation; no server-side state
/// is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatHandle {
    /// Model identifier
    pub model: String,
    /// System prompt for the whole conversation
    pub system_instruction: String,
    /// Prior turns, oldest first
    pub history: Vec<ChatMessage>,
}

/// Text generation backend
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate a complete response for a single prompt
    async fn generate_once(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Prepare a conversation seeded with `history`
    fn create_session(
        &self,
        model: &str,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> ChatHandle {
        ChatHandle {
            model: model.to_string(),
            system_instruction: system_instruction.to_string(),
            history: history.to_vec(),
        }
    }

    /// Send `message` in the conversation and stream the reply
    async fn stream_reply(
        &self,
        handle: &ChatHandle,
        message: &str,
    ) -> Result<ChunkStream, ProviderError>;
}
