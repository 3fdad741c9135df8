//! Seams between the poll loop and the outside world.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Where homework statuses come from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw envelope for changes since `from_date` (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// Where notifications go.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver plain text to `chat_id`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}
