//! Chat module
//!
//! Handles chat sessions, their in-memory store and the optional on-disk archive.

pub mod models;
pub mod persistence;
pub mod store;

pub use models::{ChatMessage, ChatSession, MessageRole, SessionId, DEFAULT_TITLE};
pub use persistence::SessionArchive;
pub use store::SessionStore;
