//! Telegram Bot channel — plain-text message sending via Bot API.

use async_trait::async_trait;
use hwbot_core::config::BotConfig;
use hwbot_core::error::{BotError, Result};
use hwbot_core::traits::Notifier;
use serde::{Deserialize, Serialize};

/// Telegram channel configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

impl TelegramConfig {
    pub fn from_bot_config(config: &BotConfig) -> Self {
        Self {
            bot_token: config.telegram_token.clone().unwrap_or_default(),
            api_base: config.telegram_api_base.clone(),
        }
    }
}

/// Sends notifications through a Telegram bot.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// Send a text message. No parse mode: the text goes out verbatim.
    pub async fn send_text(&self, chat_id: &str, text: &str) -> Result<()> {
        tracing::info!("Sending Telegram message");
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Delivery(format!("sendMessage failed: {}", e.without_url())))?;

        let status = response.status();
        let result: TelegramApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| BotError::Delivery(format!("Invalid send response ({status}): {e}")))?;

        if !result.ok {
            return Err(BotError::Delivery(format!(
                "Send failed: {}",
                result.description.unwrap_or_else(|| status.to_string())
            )));
        }
        tracing::debug!("Telegram message delivered");
        Ok(())
    }

    /// Get bot info.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        let response = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| BotError::Delivery(format!("getMe failed: {}", e.without_url())))?;
        let body: TelegramApiResponse<TelegramUser> = response
            .json()
            .await
            .map_err(|e| BotError::Delivery(format!("Invalid getMe response: {e}")))?;
        if !body.ok {
            return Err(BotError::Delivery(format!(
                "getMe rejected: {}",
                body.description.unwrap_or_default()
            )));
        }
        body.result
            .ok_or_else(|| BotError::Delivery("No bot info".into()))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        self.send_text(chat_id, text).await
    }
}

// --- Telegram API Types ---

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}
