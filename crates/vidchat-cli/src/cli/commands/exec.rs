//! Exec command handler.

use std::sync::Arc;

use anyhow::Result;
use vidchat_core::config::Config;
use vidchat_core::session::{APOLOGY_TEXT, DisplayBody, DisplayLog, Session, SessionOptions};

pub struct ExecRunOptions<'a> {
    pub prompt: &'a str,
    pub config: &'a Config,
    pub url: Option<&'a str>,
    /// Page location the prompt is about.
    pub location: Option<&'a str>,
}

/// Runs one exchange and prints the reply markup.
pub async fn run(options: ExecRunOptions<'_>) -> Result<()> {
    if options.prompt.trim().is_empty() {
        anyhow::bail!("Prompt is empty");
    }

    let transport = super::transport(options.config, options.url)?;
    let log = DisplayLog::new();
    let mut session = Session::new(
        SessionOptions::from_config(options.config),
        Arc::new(transport),
        Box::new(log.clone()),
    );
    if let Some(location) = options.location {
        session.navigate(location);
    }
    session.activate();

    session.send_user_message(options.prompt);
    session.settle().await;

    let state = log.snapshot();
    match state.entries.last().map(|entry| &entry.body) {
        Some(DisplayBody::Markup(markup)) => {
            println!("{markup}");
            Ok(())
        }
        _ => anyhow::bail!("{APOLOGY_TEXT}"),
    }
}
