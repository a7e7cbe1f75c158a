//! Line-oriented display sink for the chat command.

use std::collections::HashSet;

use vidchat_core::session::{DisplayEntry, DisplaySink, MessageId};

/// Prints conversation entries to stdout and widget chrome to stderr.
///
/// Placeholders go to stderr so piped stdout holds only the conversation.
#[derive(Debug, Default)]
pub struct TerminalSink {
    visible: bool,
    /// Placeholders printed and not yet removed.
    placeholders: HashSet<MessageId>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for TerminalSink {
    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            eprintln!("[{}]", if visible { "chat shown" } else { "chat hidden" });
        }
    }

    fn append(&mut self, entry: DisplayEntry) {
        if entry.is_placeholder {
            eprintln!("{}> {}", entry.sender, entry.body.as_str());
            self.placeholders.insert(entry.id);
        } else {
            println!("{}> {}", entry.sender, entry.body.as_str());
        }
    }

    fn remove(&mut self, id: MessageId) -> bool {
        // Terminal output cannot be retracted; only bookkeeping changes.
        self.placeholders.remove(&id)
    }
}
