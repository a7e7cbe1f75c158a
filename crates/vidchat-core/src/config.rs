//! Configuration management for vidchat.
//!
//! Loads configuration from ${VIDCHAT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `backend_url`.
pub const BACKEND_URL_ENV: &str = "VIDCHAT_BACKEND_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for vidchat configuration and data directories.
    //!
    //! VIDCHAT_HOME resolution order:
    //! 1. VIDCHAT_HOME environment variable (if set)
    //! 2. ~/.config/vidchat (default)

    use std::path::PathBuf;

    /// Returns the vidchat home directory.
    ///
    /// Checks VIDCHAT_HOME env var first, falls back to ~/.config/vidchat
    /// (or ./.vidchat when no home directory can be determined).
    pub fn vidchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("VIDCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".vidchat"),
            |h| h.join(".config").join("vidchat"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        vidchat_home().join("config.toml")
    }

    /// Returns the directory that receives log files.
    pub fn logs_dir() -> PathBuf {
        vidchat_home().join("logs")
    }
}

/// Pixel offset of the launcher from the bottom-right corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOffset {
    pub bottom: i32,
    pub right: i32,
}

impl Default for WidgetOffset {
    fn default() -> Self {
        Self {
            bottom: 20,
            right: 20,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat backend
    pub backend_url: String,

    /// Timeout for a single backend request in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Query parameter carrying the media item id
    pub resource_param: String,

    /// Whether an apology for a failed exchange is appended to history
    pub record_failed_exchanges: bool,

    /// Greeting shown on first activation
    pub greeting: String,

    /// Default launcher placement
    #[serde(default)]
    pub initial_offset: WidgetOffset,
}

impl Config {
    const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 60;
    const DEFAULT_RESOURCE_PARAM: &str = "v";
    const DEFAULT_GREETING: &str = "Hello! I can help you understand this video. Ask me anything!";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the backend URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not a valid absolute URL.
    pub fn effective_backend_url(&self) -> Result<String> {
        let env = std::env::var(BACKEND_URL_ENV).ok();
        resolve_backend_url(env.as_deref(), &self.backend_url)
    }

    /// Returns the request timeout, or None when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Self::DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            resource_param: Self::DEFAULT_RESOURCE_PARAM.to_string(),
            record_failed_exchanges: true,
            greeting: Self::DEFAULT_GREETING.to_string(),
            initial_offset: WidgetOffset::default(),
        }
    }
}

/// Resolves the backend URL: a non-blank env value wins, then the config value,
/// then the built-in default. Trailing slashes are trimmed so paths can be appended.
fn resolve_backend_url(env_value: Option<&str>, config_value: &str) -> Result<String> {
    let chosen = [env_value, Some(config_value)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(Config::DEFAULT_BACKEND_URL);

    normalize_backend_url(chosen)
}

/// Validates an explicit backend URL and trims trailing slashes.
///
/// # Errors
/// Returns an error if `value` is not a valid absolute URL.
pub fn normalize_backend_url(value: &str) -> Result<String> {
    let value = value.trim();
    url::Url::parse(value).with_context(|| format!("Invalid backend URL: {value}"))?;
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.initial_offset, WidgetOffset { bottom: 20, right: 20 });
        assert!(config.record_failed_exchanges);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "backend_url = \"http://10.0.0.2:8080\"\n[initial_offset]\nright = 64\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.2:8080");
        assert_eq!(config.initial_offset.right, 64);
        assert_eq!(config.initial_offset.bottom, 20);
        assert_eq!(config.resource_param, "v");
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "backend_url = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("backend_url = \"http://localhost:5000\""));
        assert!(contents.contains("[initial_offset]"));

        // Template must parse back to the Rust defaults.
        let loaded = Config::load_from(&config_path).unwrap();
        let defaults = Config::default();
        assert_eq!(loaded.backend_url, defaults.backend_url);
        assert_eq!(loaded.greeting, defaults.greeting);
        assert_eq!(loaded.request_timeout_secs, defaults.request_timeout_secs);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), None);

        let config = Config::default();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_backend_url_env_wins_over_config() {
        let url = resolve_backend_url(Some("http://env:9000/"), "http://config:1").unwrap();
        assert_eq!(url, "http://env:9000");
    }

    #[test]
    fn test_backend_url_blank_env_falls_back_to_config() {
        let url = resolve_backend_url(Some("   "), "http://config:1/").unwrap();
        assert_eq!(url, "http://config:1");
    }

    #[test]
    fn test_backend_url_blank_everywhere_uses_default() {
        let url = resolve_backend_url(None, "").unwrap();
        assert_eq!(url, "http://localhost:5000");
    }

    #[test]
    fn test_backend_url_invalid_is_error() {
        assert!(resolve_backend_url(None, "not a url").is_err());
    }

    #[test]
    fn test_normalize_explicit_url() {
        assert_eq!(
            normalize_backend_url(" http://127.0.0.1:5000// ").unwrap(),
            "http://127.0.0.1:5000"
        );
        assert!(normalize_backend_url("localhost").is_err());
    }
}
