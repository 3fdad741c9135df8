//! Poll loop — fetches statuses on a fixed interval and reports changes.
//! One cycle finishes (request, validate, translate, notify) before the sleep
//! starts; cycles never overlap.

use std::time::Duration;

use async_trait::async_trait;
use hwbot_core::config::BotConfig;
use hwbot_core::error::{BotError, Result};
use hwbot_core::traits::{Notifier, StatusSource};
use hwbot_core::{validate, verdict};

use crate::notify::{MessageKind, MessageLog};

/// Where the loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Startup,
    Polling,
    Sleeping,
    /// Required configuration was missing. Terminal.
    Aborted,
}

/// Timer the loop waits on between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, period: Duration);
}

/// Real timer backed by `tokio::time::sleep`.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// Text sent when the API reports nothing new since `cursor`.
pub fn no_changes_message(cursor: i64) -> String {
    format!("{cursor}, no changes in homework.")
}

/// Longest diagnostic sent to the chat, in chars. Telegram caps messages at 4096.
pub const MAX_FAILURE_CHARS: usize = 1024;

/// Text sent when a cycle fails, cut to [`MAX_FAILURE_CHARS`].
pub fn failure_message(err: &BotError) -> String {
    let full = format!("Program failure: {err}");
    match full.char_indices().nth(MAX_FAILURE_CHARS) {
        Some((cut, _)) => format!("{}…", &full[..cut]),
        None => full,
    }
}

/// The poll-and-notify state machine.
pub struct PollLoop {
    state: LoopState,
    config: BotConfig,
    chat_id: String,
    source: Box<dyn StatusSource>,
    notifier: Box<dyn Notifier>,
    sleeper: Box<dyn Sleeper>,
    start_cursor: Option<i64>,
    cursor: i64,
    log: MessageLog,
    cycles: u64,
}

impl PollLoop {
    pub fn new(
        config: BotConfig,
        source: Box<dyn StatusSource>,
        notifier: Box<dyn Notifier>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        let chat_id = config.telegram_chat_id.clone().unwrap_or_default();
        Self {
            state: LoopState::Startup,
            config,
            chat_id,
            source,
            notifier,
            sleeper,
            start_cursor: None,
            cursor: 0,
            log: MessageLog::new(),
            cycles: 0,
        }
    }

    /// Start polling from `from_date` instead of the current time.
    pub fn with_start_cursor(mut self, from_date: i64) -> Self {
        self.start_cursor = Some(from_date);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    /// Completed poll cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run the current state and move to the next one.
    pub async fn step(&mut self) -> LoopState {
        self.state = match self.state {
            LoopState::Startup => self.startup(),
            LoopState::Polling => {
                self.poll().await;
                LoopState::Sleeping
            }
            LoopState::Sleeping => {
                self.sleeper.sleep(self.config.retry_period()).await;
                LoopState::Polling
            }
            LoopState::Aborted => LoopState::Aborted,
        };
        self.state
    }

    /// Poll forever. Only returns if startup aborts.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Poll loop started (every {}s, notifier: {})",
            self.config.retry_period_secs,
            self.notifier.name()
        );
        loop {
            if self.step().await == LoopState::Aborted {
                return Err(BotError::MissingConfig(self.config.missing_required()));
            }
        }
    }

    /// Run until one poll cycle has completed, without the trailing sleep.
    pub async fn run_once(&mut self) -> Result<()> {
        loop {
            let before = self.state;
            if self.step().await == LoopState::Aborted {
                return Err(BotError::MissingConfig(self.config.missing_required()));
            }
            if before == LoopState::Polling {
                return Ok(());
            }
        }
    }

    fn startup(&mut self) -> LoopState {
        if let Err(e) = self.config.require() {
            tracing::error!("Startup aborted: {e}");
            return LoopState::Aborted;
        }
        self.cursor = self
            .start_cursor
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        self.log = MessageLog::new();
        tracing::debug!("Starting from cursor {}", self.cursor);
        LoopState::Polling
    }

    async fn poll(&mut self) {
        if let Err(e) = self.check_updates().await {
            self.report_failure(&e).await;
        }
        self.cycles += 1;
    }

    async fn check_updates(&mut self) -> Result<()> {
        let response = self.source.fetch(self.cursor).await?;
        let homeworks = validate::check_response(&response)?;
        let message = match homeworks.first() {
            Some(homework) => verdict::parse_status_value(homework)?,
            None => no_changes_message(self.cursor),
        };

        if self.log.claim(&message) {
            let sent = self.notifier.send_message(&self.chat_id, &message).await;
            self.log.record(&message, MessageKind::Status, sent.is_ok());
            sent?;
        } else {
            tracing::debug!("No new statuses");
        }

        self.cursor = validate::next_cursor(&response, self.cursor);
        Ok(())
    }

    /// Best-effort report; a delivery failure here is only logged.
    async fn report_failure(&mut self, err: &BotError) {
        let message = failure_message(err);
        if self.log.claim(&message) {
            let delivered = match self.notifier.send_message(&self.chat_id, &message).await {
                Ok(()) => true,
                Err(send_err) => {
                    tracing::error!("Could not report failure via {}: {send_err}", self.notifier.name());
                    false
                }
            };
            self.log.record(&message, MessageKind::Failure, delivered);
        }
        tracing::error!("Program failure: {err}");
    }
}
