use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod widget;

pub use widget::{ChatWidget, ReplyTexts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp,
        }
    }
}

/// Append-only, session-local chat history.
#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    entries: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        self.entries.push(ChatMessage::new(Sender::User, text, at));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        self.entries.push(ChatMessage::new(Sender::Assistant, text, at));
    }
}
