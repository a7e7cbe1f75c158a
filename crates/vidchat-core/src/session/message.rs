//! Messages and the append-only conversation history.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transport::HistoryEntry;

/// Opaque unique message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub is_placeholder: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::User,
            text: text.into(),
            is_placeholder: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::Bot,
            text: text.into(),
            is_placeholder: false,
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            is_placeholder: true,
            ..Self::bot(text)
        }
    }
}

/// Ordered, append-only message log.
///
/// Placeholders are rejected: they belong to the display, never to history.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Returns false (and drops it) for placeholders.
    pub fn push(&mut self, message: Message) -> bool {
        if message.is_placeholder {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }

    /// Snapshot in the backend's wire shape.
    pub fn to_wire(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(|m| HistoryEntry {
                sender: m.sender,
                message: m.text.clone(),
            })
            .collect()
    }
}
