//! File-based tracing setup.
//!
//! Logs go to `$VIDCHAT_HOME/logs/vidchat.log` so they never interleave with
//! conversation output on stdout.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VIDCHAT_LOG";

pub const LOG_FILE_NAME: &str = "vidchat.log";

const DEFAULT_FILTER: &str = "warn";

/// Filter from `VIDCHAT_LOG`, falling back to `warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber writing to `logs_dir`.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the writer. A subscriber that is already installed is
/// left in place.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(logs_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
