//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod exec;
pub mod render;
pub mod status;

use anyhow::{Context, Result};
use vidchat_core::config::{self as core_config, Config};
use vidchat_core::transport::HttpTransport;

/// Builds the backend transport. `--url` beats env and config.
fn transport(config: &Config, url: Option<&str>) -> Result<HttpTransport> {
    match url {
        Some(url) => {
            let base = core_config::normalize_backend_url(url)?;
            HttpTransport::new(base, config.request_timeout())
        }
        None => HttpTransport::from_config(config),
    }
    .context("create backend transport")
}
