//! # Homework Bot
//!
//! Polls the homework review API every few minutes and sends a Telegram
//! message whenever the review status of the latest homework changes.
//!
//! Usage:
//!   homework-bot                          # Poll forever (tokens from env)
//!   homework-bot --once                   # One poll cycle, then exit
//!   homework-bot --from-date 1700000000   # Start from a given timestamp
//!   homework-bot --config bot.toml        # Read settings from a TOML file
//!
//! Secrets may also live in a `.env` file in the working directory (or any
//! parent); real environment variables take precedence over it.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use hwbot_api::PracticumClient;
use hwbot_channels::{TelegramConfig, TelegramNotifier};
use hwbot_core::{BotConfig, BotError};
use hwbot_scheduler::{PollLoop, TokioSleeper};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "homework-bot",
    version,
    about = "📚 Homework status bot — reports review changes to Telegram"
)]
struct Cli {
    /// Config file (TOML). Defaults to ~/.hwbot/config.toml when present
    #[arg(short, long)]
    config: Option<String>,

    /// Homework API OAuth token
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    practicum_token: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Chat that receives notifications
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// Homework status endpoint URL
    #[arg(long, env = "HWBOT_ENDPOINT")]
    endpoint: Option<String>,

    /// Seconds between polls
    #[arg(long, env = "HWBOT_RETRY_PERIOD")]
    retry_period: Option<u64>,

    /// Log file (truncated on start)
    #[arg(long, env = "HWBOT_LOG_FILE")]
    log_file: Option<String>,

    /// Unix timestamp to start polling from (default: now)
    #[arg(long)]
    from_date: Option<i64>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log the bot identity (Telegram getMe) before polling
    #[arg(long)]
    check_bot: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

/// Load `.env` (or `path`) into the process environment so clap's `env`
/// bindings see it. Variables already set are left alone.
fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(p) => dotenvy::from_path(p).ok().map(|()| p.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn load_config(cli: &Cli) -> Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => BotConfig::load_from(&expand_path(path))?,
        None => BotConfig::load()?,
    };

    // Env and flags win over the file
    if let Some(token) = &cli.practicum_token {
        config.practicum_token = Some(token.clone());
    }
    if let Some(token) = &cli.telegram_token {
        config.telegram_token = Some(token.clone());
    }
    if let Some(chat_id) = &cli.telegram_chat_id {
        config.telegram_chat_id = Some(chat_id.clone());
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(secs) = cli.retry_period {
        config.retry_period_secs = secs;
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = log_file.clone();
    }
    Ok(config)
}

fn init_logging(log_file: &str, verbose: bool) -> Result<()> {
    let path = expand_path(log_file);
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = if verbose {
        "homework_bot=debug,hwbot_core=debug,hwbot_api=debug,hwbot_channels=debug,hwbot_scheduler=debug"
    } else {
        "homework_bot=info,hwbot_core=info,hwbot_api=info,hwbot_channels=info,hwbot_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {e}"))?;
    Ok(())
}

/// Process exit status for the loop's outcome. Missing config is fatal (1).
fn exit_code(outcome: hwbot_core::Result<()>) -> Result<u8> {
    match outcome {
        Ok(()) => Ok(0),
        Err(e @ BotError::MissingConfig(_)) => {
            tracing::error!("Program forcibly stopped: {e}");
            eprintln!("❌ {e}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let env_file = load_env_file(None);
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.log_file, cli.verbose)?;
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }
    tracing::debug!("Loaded {config:?}");

    let source = PracticumClient::from_config(&config)?;
    let telegram = TelegramNotifier::new(TelegramConfig::from_bot_config(&config));

    // getMe needs a token; without one the loop aborts on its own.
    if cli.check_bot && config.missing_required().is_empty() {
        match telegram.get_me().await {
            Ok(me) => tracing::info!(
                "Telegram bot: @{} ({})",
                me.username.as_deref().unwrap_or("unknown"),
                me.first_name
            ),
            Err(e) => tracing::warn!("Bot check failed: {e}"),
        }
    }

    let mut poll = PollLoop::new(
        config,
        Box::new(source),
        Box::new(telegram),
        Box::new(TokioSleeper),
    );
    if let Some(from_date) = cli.from_date {
        poll = poll.with_start_cursor(from_date);
    }

    let outcome = if cli.once {
        poll.run_once().await
    } else {
        poll.run().await
    };

    tracing::info!("Notifications: {}", poll.messages().summary());
    for sent in poll.messages().history() {
        tracing::debug!(
            "[{}] {:?} delivered={}: {}",
            sent.timestamp.format("%H:%M:%S UTC"),
            sent.kind,
            sent.delivered,
            sent.text
        );
    }

    exit_code(outcome).map(ExitCode::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        std::fs::write(&path, "retry_period_secs = 60\n").unwrap();

        let cli = Cli::try_parse_from([
            "homework-bot",
            "--config",
            path.to_str().unwrap(),
            "--retry-period",
            "5",
            "--telegram-chat-id",
            "777",
            "--once",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.retry_period_secs, 5);
        assert_eq!(config.telegram_chat_id.as_deref(), Some("777"));
        assert!(cli.once);
    }

    #[test]
    fn test_env_file_feeds_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "HWBOT_LOG_FILE=from-dotenv.log\n").unwrap();

        assert_eq!(load_env_file(Some(path.as_path())), Some(path.clone()));
        let cli = Cli::try_parse_from(["homework-bot"]).unwrap();
        assert_eq!(cli.log_file.as_deref(), Some("from-dotenv.log"));
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(Some(dir.path().join(".env").as_path())).is_none());
    }

    #[test]
    fn test_init_logging_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.log");
        std::fs::write(&path, "stale line\n").unwrap();

        init_logging(path.to_str().unwrap(), false).unwrap();
        tracing::info!("logger smoke line");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale line"));
        assert!(written.contains("INFO"));
        assert!(written.contains("logger smoke line"));
    }

    #[test]
    fn test_init_logging_bad_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("main.log");
        assert!(init_logging(path.to_str().unwrap(), false).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Ok(())).unwrap(), 0);
        assert_eq!(
            exit_code(Err(BotError::MissingConfig(vec!["TELEGRAM_TOKEN"]))).unwrap(),
            1
        );
        assert!(exit_code(Err(BotError::Config("bad".into()))).is_err());
    }

    #[test]
    fn test_unreadable_config_file_fails() {
        let cli = Cli::try_parse_from(["homework-bot", "--config", "/nonexistent/bot.toml"]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
