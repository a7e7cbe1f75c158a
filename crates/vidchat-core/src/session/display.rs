//! Display sink: where the session puts things the user should see.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::message::{MessageId, Sender};
use crate::markup::Markup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBody {
    /// Shown verbatim (user input, placeholders, apology, greeting).
    Text(String),
    /// Rendered reply.
    Markup(Markup),
}

impl DisplayBody {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayBody::Text(s) => s.as_str(),
            DisplayBody::Markup(m) => m.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub id: MessageId,
    pub sender: Sender,
    pub body: DisplayBody,
    pub is_placeholder: bool,
}

/// Receives display updates from a session.
pub trait DisplaySink: Send {
    fn set_visible(&mut self, visible: bool);

    fn append(&mut self, entry: DisplayEntry);

    /// Removes an entry; returns false if it was not shown.
    fn remove(&mut self, id: MessageId) -> bool;
}

/// Current display contents.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub visible: bool,
    pub entries: Vec<DisplayEntry>,
}

impl DisplayState {
    pub fn placeholders(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter().filter(|e| e.is_placeholder)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.body.as_str()).collect()
    }
}

/// In-memory sink with a cloneable handle, so the owner can inspect what a
/// session displayed after handing the sink over.
#[derive(Debug, Clone, Default)]
pub struct DisplayLog {
    inner: Arc<Mutex<DisplayState>>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }
}

impl DisplaySink for DisplayLog {
    fn set_visible(&mut self, visible: bool) {
        self.lock().visible = visible;
    }

    fn append(&mut self, entry: DisplayEntry) {
        self.lock().entries.push(entry);
    }

    fn remove(&mut self, id: MessageId) -> bool {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        state.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, placeholder: bool) -> DisplayEntry {
        DisplayEntry {
            id: MessageId::new(),
            sender: Sender::Bot,
            body: DisplayBody::Text(text.to_string()),
            is_placeholder: placeholder,
        }
    }

    #[test]
    fn test_display_log_shares_state_across_clones() {
        let log = DisplayLog::new();
        let mut sink = log.clone();
        sink.set_visible(true);
        sink.append(entry("hello", false));

        let state = log.snapshot();
        assert!(state.visible);
        assert_eq!(state.texts(), ["hello"]);
    }

    #[test]
    fn test_remove_reports_whether_entry_existed() {
        let mut log = DisplayLog::new();
        let e = entry("Thinking...", true);
        let id = e.id;
        log.append(e);

        assert_eq!(log.snapshot().placeholders().count(), 1);
        assert!(log.remove(id));
        assert!(!log.remove(id));
        assert_eq!(log.snapshot().placeholders().count(), 0);
    }
}
