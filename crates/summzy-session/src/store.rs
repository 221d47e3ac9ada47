//! Per-chat document conversations.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in a chat session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Conversation about one summarized document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSession {
    pub chat_id: i64,
    /// URL the document was fetched from.
    pub source_url: String,
    /// Document text used as context for follow-up questions.
    pub extracted_content: String,
    pub summary: String,
    /// Turns in order; starts with the summary as an assistant turn.
    pub history: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Thread-safe map of chat ID to its current session.
///
/// Accessors return snapshots; the stored session is only changed through
/// the store's methods.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, ChatSession>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session for `chat_id`, discarding any previous one.
    pub fn replace(
        &self,
        chat_id: i64,
        source_url: impl Into<String>,
        extracted_content: impl Into<String>,
        summary: impl Into<String>,
    ) -> ChatSession {
        let summary = summary.into();
        let first_turn = ChatTurn::now(Role::Assistant, summary.clone());
        let session = ChatSession {
            chat_id,
            source_url: source_url.into(),
            extracted_content: extracted_content.into(),
            summary,
            created_at: first_turn.at,
            updated_at: first_turn.at,
            history: vec![first_turn],
        };

        let replaced = self
            .sessions
            .lock()
            .unwrap()
            .insert(chat_id, session.clone())
            .is_some();
        tracing::debug!(chat_id, replaced, "Started chat session");
        session
    }

    pub fn get(&self, chat_id: i64) -> Option<ChatSession> {
        self.sessions.lock().unwrap().get(&chat_id).cloned()
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.sessions.lock().unwrap().contains_key(&chat_id)
    }

    /// Drop the session for `chat_id`. Returns whether one existed.
    pub fn clear(&self, chat_id: i64) -> bool {
        self.sessions.lock().unwrap().remove(&chat_id).is_some()
    }

    /// Append a user turn. Returns `None` when the chat has no session.
    pub fn add_user_turn(&self, chat_id: i64, content: impl Into<String>) -> Option<ChatSession> {
        self.push_turn(chat_id, ChatTurn::now(Role::User, content))
    }

    /// Append an assistant turn. Returns `None` when the chat has no session.
    pub fn add_assistant_turn(
        &self,
        chat_id: i64,
        content: impl Into<String>,
    ) -> Option<ChatSession> {
        self.push_turn(chat_id, ChatTurn::now(Role::Assistant, content))
    }

    fn push_turn(&self, chat_id: i64, turn: ChatTurn) -> Option<ChatSession> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&chat_id)?;
        session.updated_at = turn.at;
        session.history.push(turn);
        Some(session.clone())
    }
}
