//! Error taxonomy shared by every crate in the workspace.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Everything that can go wrong between startup and message delivery.
#[derive(Debug, Error)]
pub enum BotError {
    /// The request never got a response (DNS, refused connection, timeout).
    #[error("API request failed: {0}")]
    Transport(String),

    /// The endpoint answered with something other than 200.
    #[error("endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("malformed API response: {0}")]
    MalformedResponse(#[from] Malformed),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    /// The chat service refused or failed to take the message.
    #[error("Telegram delivery failed: {0}")]
    Delivery(String),

    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("config error: {0}")]
    Config(String),
}

/// Reasons a decoded response is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Malformed {
    #[error("response is not an object")]
    NotAnObject,
    #[error("no 'homeworks' key in response")]
    MissingHomeworks,
    #[error("'homeworks' is not a list")]
    HomeworksNotAList,
    #[error("no 'current_date' key in response")]
    MissingCurrentDate,
    #[error("homework has no 'homework_name'")]
    MissingHomeworkName,
    #[error("homework has no 'status'")]
    MissingStatus,
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_error_mentions_status() {
        let err = BotError::Endpoint {
            status: 503,
            body: "Service Unavailable".into(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("Service Unavailable"));
    }

    #[test]
    fn test_missing_config_lists_every_name() {
        let err = BotError::MissingConfig(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_malformed_converts() {
        let err: BotError = Malformed::HomeworksNotAList.into();
        assert!(matches!(
            err,
            BotError::MalformedResponse(Malformed::HomeworksNotAList)
        ));
    }
}
