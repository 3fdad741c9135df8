//! Notification bookkeeping — last-message dedup plus a small history.
//! No queues: one slot for dedup, a ring buffer for diagnostics.

/// Placeholder held before anything has been sent.
pub const INITIAL_MESSAGE: &str = "messages";

const HISTORY_LIMIT: usize = 100;

/// What produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Status,
    Failure,
}

/// A message the loop handed to the notifier.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub text: String,
    pub kind: MessageKind,
    pub delivered: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Tracks the last emitted message. Status and failure messages share the
/// slot, so an error repeated across cycles is reported once.
pub struct MessageLog {
    last: String,
    history: Vec<SentMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            last: INITIAL_MESSAGE.to_string(),
            history: Vec::new(),
        }
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// Exact string comparison against the last emitted message.
    pub fn is_new(&self, text: &str) -> bool {
        self.last != text
    }

    /// Take `text` as the last emitted message.
    /// Returns false (and changes nothing) if it repeats the previous one.
    pub fn claim(&mut self, text: &str) -> bool {
        if !self.is_new(text) {
            return false;
        }
        self.last = text.to_string();
        true
    }

    /// Record a delivery attempt in history.
    pub fn record(&mut self, text: &str, kind: MessageKind, delivered: bool) {
        self.history.push(SentMessage {
            text: text.to_string(),
            kind,
            delivered,
            timestamp: chrono::Utc::now(),
        });
        // Ring buffer — keep last 100
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    pub fn history(&self) -> &[SentMessage] {
        &self.history
    }

    /// One-line tally of the history, e.g. `3 sent (2 status, 1 failure), 1 undelivered`.
    pub fn summary(&self) -> String {
        let status = self
            .history
            .iter()
            .filter(|m| m.kind == MessageKind::Status)
            .count();
        let undelivered = self.history.iter().filter(|m| !m.delivered).count();
        format!(
            "{} sent ({} status, {} failure), {} undelivered",
            self.history.len(),
            status,
            self.history.len() - status,
            undelivered
        )
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
