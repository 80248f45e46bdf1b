//! Gemini API wire types
//!
//! Structs that mirror the Gemini REST JSON format. Field names are camelCase
//! on the wire.

use crate::chat::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request body for `generateContent` and `streamGenerateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns, oldest first
    pub contents: Vec<Content>,
    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    /// A single user turn with no system prompt
    pub fn single(prompt: &str) -> Self {
        Self {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
        }
    }

    /// Prior history plus a new user turn
    pub fn conversation(system_instruction: &str, history: &[ChatMessage], message: &str) -> Self {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content::text(Some(m.role.as_str()), &m.content))
            .collect();
        contents.push(Content::text(Some("user"), message));

        Self {
            contents,
            system_instruction: (!system_instruction.is_empty())
                .then(|| Content::text(None, system_instruction)),
        }
    }
}

/// Content structure shared by requests and responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Role of the content ("user" or "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// A single text part
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The text content of this part
    #[serde(default)]
    pub text: String,
}

/// Top-level response, also the payload of every SSE event
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Reason the prompt was blocked, if it was
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    /// Text of the first candidate, all parts concatenated
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A single candidate response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content of the candidate; absent when generation stopped early
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}
