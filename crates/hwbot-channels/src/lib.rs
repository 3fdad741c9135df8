//! # Homework Bot Channels
//! Outbound notification channels.

pub mod telegram;

pub use telegram::{TelegramConfig, TelegramNotifier};
