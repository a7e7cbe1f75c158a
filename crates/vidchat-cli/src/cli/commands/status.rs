//! Status command handler.

use anyhow::Result;
use vidchat_core::config::Config;

pub async fn run(config: &Config, url: Option<&str>) -> Result<()> {
    let transport = super::transport(config, url)?;
    match transport.check_status().await {
        Ok(()) => {
            println!("Backend Status: Connected");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "status probe failed");
            println!("Backend Status: Disconnected");
            anyhow::bail!("backend unreachable at {}: {err}", transport.base_url())
        }
    }
}
