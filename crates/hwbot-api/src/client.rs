//! Homework status endpoint client — one authorized GET per poll.

use std::time::Duration;

use async_trait::async_trait;
use hwbot_core::config::BotConfig;
use hwbot_core::error::{BotError, Malformed, Result};
use hwbot_core::traits::StatusSource;
use serde_json::Value;

/// Client for the homework status endpoint.
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("homework-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    /// Build from config. A missing token yields an empty one; the poll loop
    /// aborts on missing config before any request is made.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            &config.endpoint,
            config.practicum_token.as_deref().unwrap_or_default(),
            config.request_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query statuses changed since `from_date`.
    pub async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
        tracing::info!("Requesting homework statuses from_date={from_date}");
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(unreadable_body)?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Malformed::InvalidJson(e.to_string()))?;
        tracing::debug!("API answered {} bytes", body.len());
        Ok(value)
    }
}

/// A 200 arrived but its body could not be read; the response is unusable.
fn unreadable_body(err: impl std::fmt::Display) -> BotError {
    Malformed::InvalidJson(format!("body could not be read: {err}")).into()
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        self.get_api_answer(from_date).await
    }
}
