//! # Homework Bot Scheduler
//!
//! The poll-and-notify loop and its notification bookkeeping.
//!
//! ## Architecture
//! ```text
//! PollLoop (Startup → Polling ⇄ Sleeping, or Aborted)
//!   ├── StatusSource::fetch(cursor)     → raw envelope
//!   ├── validate::check_response         → homeworks
//!   ├── verdict::parse_status(first)     → status message
//!   └── MessageLog (last message dedup)  → Notifier::send_message
//! ```

pub mod engine;
pub mod notify;

pub use engine::{LoopState, PollLoop, Sleeper, TokioSleeper};
pub use notify::{MessageKind, MessageLog, SentMessage};
