//! Messages delivered by the host runtime (extension background/popup).

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Show the widget if hidden, hide it if shown.
    ToggleChat,
    /// Any action this widget does not handle.
    #[serde(other)]
    Unknown,
}

impl HostMessage {
    /// Parses a host message from JSON.
    ///
    /// # Errors
    /// Returns an error if the payload is not a JSON object with an `action`.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid host message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle_chat() {
        assert_eq!(
            HostMessage::parse(r#"{"action":"toggle-chat"}"#).unwrap(),
            HostMessage::ToggleChat
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        assert_eq!(
            HostMessage::parse(r#"{"action":"toggle-chat","tab":3}"#).unwrap(),
            HostMessage::ToggleChat
        );
    }

    #[test]
    fn test_unknown_action() {
        assert_eq!(
            HostMessage::parse(r#"{"action":"open-settings"}"#).unwrap(),
            HostMessage::Unknown
        );
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(HostMessage::parse("not json").is_err());
        assert!(HostMessage::parse(r#"{"kind":"toggle-chat"}"#).is_err());
    }
}
