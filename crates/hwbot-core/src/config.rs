//! Bot configuration system.
//!
//! Built once at startup from defaults, an optional TOML file, and
//! environment/CLI overrides, then handed to the poll loop by value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BotError, Result};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Root configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// OAuth token for the homework API.
    #[serde(default)]
    pub practicum_token: Option<String>,
    /// Telegram bot token.
    #[serde(default)]
    pub telegram_token: Option<String>,
    /// Chat that receives notifications.
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_retry_period")]
    pub retry_period_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_endpoint() -> String { "https://practicum.yandex.ru/api/user_api/homework_statuses/".into() }
fn default_retry_period() -> u64 { 600 }
fn default_request_timeout() -> u64 { 30 }
fn default_telegram_api_base() -> String { "https://api.telegram.org".into() }
fn default_log_file() -> String { "main.log".into() }

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            practicum_token: None,
            telegram_token: None,
            telegram_chat_id: None,
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period(),
            request_timeout_secs: default_request_timeout(),
            telegram_api_base: default_telegram_api_base(),
            log_file: default_log_file(),
        }
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_period_secs", &self.retry_period_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "***",
        None => "<unset>",
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl BotConfig {
    /// Load config from the default path (~/.hwbot/config.toml), or defaults
    /// when no file exists there.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("Failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| BotError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hwbot")
            .join("config.toml")
    }

    /// Names of the required variables that are absent or blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_present(&self.practicum_token) {
            missing.push(PRACTICUM_TOKEN);
        }
        if !is_present(&self.telegram_token) {
            missing.push(TELEGRAM_TOKEN);
        }
        if !is_present(&self.telegram_chat_id) {
            missing.push(TELEGRAM_CHAT_ID);
        }
        missing
    }

    /// Fails with [`BotError::MissingConfig`] naming every absent variable.
    pub fn require(&self) -> Result<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BotError::MissingConfig(missing))
        }
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> BotConfig {
        BotConfig {
            practicum_token: Some("p-token".into()),
            telegram_token: Some("t-token".into()),
            telegram_chat_id: Some("42".into()),
            ..BotConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.retry_period(), Duration::from_secs(600));
        assert_eq!(config.log_file, "main.log");
        assert!(config.endpoint.ends_with("/homework_statuses/"));
    }

    #[test]
    fn test_missing_required_lists_all() {
        let config = BotConfig::default();
        assert_eq!(
            config.missing_required(),
            vec![PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID]
        );
        assert!(matches!(config.require(), Err(BotError::MissingConfig(v)) if v.len() == 3));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut config = full();
        config.telegram_chat_id = Some("   ".into());
        assert_eq!(config.missing_required(), vec![TELEGRAM_CHAT_ID]);
    }

    #[test]
    fn test_complete_config_passes() {
        assert!(full().require().is_ok());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let printed = format!("{:?}", full());
        assert!(!printed.contains("p-token"));
        assert!(!printed.contains("t-token"));
        assert!(printed.contains("42"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "telegram_chat_id = \"100500\"\nretry_period_secs = 60\n",
        )
        .unwrap();

        let config = BotConfig::load_from(&path).unwrap();
        assert_eq!(config.telegram_chat_id.as_deref(), Some("100500"));
        assert_eq!(config.retry_period_secs, 60);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.practicum_token.is_none());
    }

    #[test]
    fn test_load_from_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retry_period_secs = \"soon\"").unwrap();
        assert!(matches!(BotConfig::load_from(&path), Err(BotError::Config(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BotConfig::load_from(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(BotError::Config(_))));
    }
}
