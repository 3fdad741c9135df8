//! # Homework Bot Core
//! Shared building blocks for the homework status bot:
//! configuration, the error taxonomy, the homework data model,
//! the response validator, the status translator, and the
//! traits the poll loop is wired through.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod validate;
pub mod verdict;

pub use config::BotConfig;
pub use error::{BotError, Malformed, Result};
pub use traits::{Notifier, StatusSource};
pub use types::Homework;
pub use verdict::Verdict;
