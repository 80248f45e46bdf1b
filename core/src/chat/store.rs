//! Chat session store
//!
//! Owns every session and tracks which one is active. Sessions keep their
//! creation order; listings show the newest first.

use crate::chat::models::{ChatSession, SessionId};
use std::collections::HashMap;
use tracing::debug;

/// In-memory registry of chat sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    /// Registry of all sessions (id -> session)
    sessions: HashMap<SessionId, ChatSession>,
    /// Session ids in creation order
    order: Vec<SessionId>,
    /// ID of the active session, if any
    active_id: Option<SessionId>,
    /// Bumped when saved content changes; selection does not count
    revision: u64,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously saved sessions, oldest first
    ///
    /// No session is active afterwards. Duplicate ids keep the last copy.
    pub fn from_sessions(sessions: Vec<ChatSession>) -> Self {
        let mut store = Self::new();
        for session in sessions {
            store.update(session);
        }
        store.revision = 0;
        store
    }

    /// Create a new empty session and make it active
    pub fn create(&mut self) -> ChatSession {
        let session = ChatSession::new();
        self.update(session.clone());
        self.active_id = Some(session.id.clone());
        debug!(session_id = %session.id, "Created chat session");
        session
    }

    /// Make `id` the active session
    /// Returns true if the session was found and selected
    pub fn select(&mut self, id: &str) -> bool {
        if self.sessions.contains_key(id) {
            self.active_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Remove a session
    /// If the removed session was active, the selection is cleared
    pub fn delete(&mut self, id: &str) -> Option<ChatSession> {
        let removed = self.sessions.remove(id)?;
        self.order.retain(|existing| existing != id);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
        self.revision += 1;
        debug!(session_id = %id, "Deleted chat session");
        Some(removed)
    }

    /// Insert or replace a session by id
    pub fn update(&mut self, session: ChatSession) {
        if !self.sessions.contains_key(&session.id) {
            self.order.push(session.id.clone());
        }
        self.sessions.insert(session.id.clone(), session);
        self.revision += 1;
    }

    /// Get a session by id
    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// ID of the active session
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active session, if any
    pub fn active(&self) -> Option<&ChatSession> {
        self.active_id.as_deref().and_then(|id| self.sessions.get(id))
    }

    /// Clear the active selection
    pub fn deselect(&mut self) {
        self.active_id = None;
    }

    /// All sessions, newest first
    pub fn list(&self) -> Vec<&ChatSession> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.sessions.get(id))
            .collect()
    }

    /// All sessions, oldest first, for saving
    pub fn snapshot(&self) -> Vec<ChatSession> {
        self.order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .cloned()
            .collect()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Counter that changes whenever the saved sessions change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::{ChatMessage, DEFAULT_TITLE};

    #[test]
    fn test_create_makes_session_active() {
        let mut store = SessionStore::new();
        let session = store.create();

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), Some(session.id.as_str()));
        assert_eq!(store.active().unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_create_then_delete_active() {
        let mut store = SessionStore::new();
        let session = store.create();

        let removed = store.delete(&session.id);
        assert!(removed.is_some());
        assert!(store.is_empty());
        assert!(store.get(&session.id).is_none());
        assert!(store.active().is_none());
        assert!(store.active_id().is_none());
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let mut store = SessionStore::new();
        let first = store.create();
        let second = store.create();

        store.delete(&first.id);
        assert_eq!(store.active_id(), Some(second.id.as_str()));
        assert!(store.delete("missing").is_none());
    }

    #[test]
    fn test_select() {
        let mut store = SessionStore::new();
        let first = store.create();
        store.create();

        assert!(store.select(&first.id));
        assert_eq!(store.active_id(), Some(first.id.as_str()));
        assert!(!store.select("missing"));
        assert_eq!(store.active_id(), Some(first.id.as_str()));
    }

    #[test]
    fn test_update_is_upsert() {
        let mut store = SessionStore::new();
        let mut session = store.create();
        session.record_exchange(ChatMessage::user("hi"), ChatMessage::model("hello"));
        store.update(session.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&session.id).unwrap().messages.len(), 2);

        let other = ChatSession::with_id("external".to_string());
        store.update(other);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = SessionStore::new();
        let a = store.create();
        let b = store.create();
        let c = store.create();

        let ids: Vec<&str> = store.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![c.id.as_str(), b.id.as_str(), a.id.as_str()]);

        let snapshot: Vec<String> = store.snapshot().into_iter().map(|s| s.id).collect();
        assert_eq!(snapshot, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut store = SessionStore::new();
        let start = store.revision();
        let session = store.create();
        let after_create = store.revision();
        assert!(after_create > start);

        store.get(&session.id);
        assert_eq!(store.revision(), after_create);

        store.delete(&session.id);
        assert!(store.revision() > after_create);
    }

    #[test]
    fn test_selection_does_not_bump_revision() {
        let mut store = SessionStore::new();
        let first = store.create();
        store.create();
        let before = store.revision();

        assert!(store.select(&first.id));
        store.deselect();
        assert!(!store.select("missing"));
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_from_sessions_has_no_active() {
        let sessions = vec![
            ChatSession::with_id("1".to_string()),
            ChatSession::with_id("2".to_string()),
        ];
        let store = SessionStore::from_sessions(sessions);
        assert_eq!(store.len(), 2);
        assert!(store.active().is_none());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.list()[0].id, "2");
    }
}
