//! Chat command handler.
//!
//! Reads one line at a time from stdin. Lines starting with `:` are widget
//! commands; anything else is sent as a user message and the loop waits
//! for the reply before reading on.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use vidchat_core::config::Config;
use vidchat_core::host::HostMessage;
use vidchat_core::session::{Session, SessionOptions};

use crate::terminal::TerminalSink;

#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Quit,
    Toggle,
    Navigate(&'a str),
    Host(&'a str),
    Say(&'a str),
    Unknown(&'a str),
}

impl<'a> ChatInput<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix(':') else {
            return ChatInput::Say(line);
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        match name {
            "q" | "quit" => ChatInput::Quit,
            "toggle" => ChatInput::Toggle,
            "nav" if !arg.is_empty() => ChatInput::Navigate(arg),
            "host" if !arg.is_empty() => ChatInput::Host(arg),
            _ => ChatInput::Unknown(trimmed),
        }
    }
}

pub async fn run(config: &Config, url: Option<&str>, location: Option<&str>) -> Result<()> {
    let transport = super::transport(config, url)?;
    let mut session = Session::new(
        SessionOptions::from_config(config),
        Arc::new(transport),
        Box::new(TerminalSink::new()),
    );
    if let Some(location) = location {
        session.navigate(location);
    }
    session.activate();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        match ChatInput::parse(&line) {
            ChatInput::Quit => break,
            ChatInput::Toggle => session.toggle(),
            ChatInput::Navigate(location) => {
                if session.navigate(location) {
                    eprintln!(
                        "[resource: {}]",
                        session.external_resource_id().unwrap_or("none")
                    );
                }
            }
            ChatInput::Host(json) => match HostMessage::parse(json) {
                Ok(message) => session.handle_host_message(message),
                Err(e) => eprintln!("{e:#}"),
            },
            ChatInput::Unknown(command) => eprintln!("Unknown command: {command}"),
            ChatInput::Say(text) => {
                if !session.is_active() {
                    eprintln!("Chat is hidden (use :toggle to show it)");
                    continue;
                }
                if session.send_user_message(text).is_some() {
                    session.settle().await;
                }
            }
        }
    }

    session.deactivate();
    Ok(())
}
