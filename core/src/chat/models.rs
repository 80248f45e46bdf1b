//! Chat data models
//!
//! Defines structures for sessions and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to every new session until its first exchange
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum number of characters taken from the first message for a title
pub const TITLE_MAX_CHARS: usize = 30;

/// Unique identifier for a chat session
pub type SessionId = String;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the model
    Model,
}

impl MessageRole {
    /// Convert the role to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// A single message in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A message written by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// A message written by the model
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: content.into(),
        }
    }
}

/// A titled conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for the session
    pub id: SessionId,
    /// Title shown in the history list
    pub title: String,
    /// Messages in the order they were exchanged
    pub messages: Vec<ChatMessage>,
    /// When the session was created (Unix timestamp)
    pub created_at: i64,
    /// When the session was last updated (Unix timestamp)
    pub updated_at: i64,
}

impl ChatSession {
    /// Create an empty session with a fresh id and the default title
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create an empty session with the given id
    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session still carries the placeholder title
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Append a completed exchange
    ///
    /// The title is derived from `user` only while it is still the default.
    pub fn record_exchange(&mut self, user: ChatMessage, reply: ChatMessage) {
        if self.has_default_title() && user.role == MessageRole::User {
            self.title = title_from_message(&user.content);
        }
        self.messages.push(user);
        self.messages.push(reply);
        self.updated_at = Utc::now().timestamp();
    }

    /// Get updated_at as DateTime
    pub fn updated_at_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.updated_at, 0).unwrap_or_else(Utc::now)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Title for a session whose first message is `content`
pub fn title_from_message(content: &str) -> String {
    content.chars().take(TITLE_MAX_CHARS).collect()
}
