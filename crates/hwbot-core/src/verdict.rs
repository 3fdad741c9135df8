//! Status translator: review status code → human-readable verdict.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{BotError, Result};
use crate::types::Homework;

/// Review outcome reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Wire code used by the API.
    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Fixed sentence sent to the chat.
    pub fn text(self) -> &'static str {
        match self {
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken up for review.",
            Self::Rejected => "The work has been reviewed: the reviewer left comments.",
        }
    }
}

impl FromStr for Verdict {
    type Err = BotError;

    fn from_str(code: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| BotError::UnknownStatus(code.to_string()))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Build the notification text for one homework record.
pub fn parse_status(homework: &Homework) -> Result<String> {
    let verdict: Verdict = homework.status.parse()?;
    Ok(format!(
        "Status of homework \"{}\" changed. {verdict}",
        homework.homework_name
    ))
}

/// Same as [`parse_status`], starting from the raw JSON record.
pub fn parse_status_value(value: &Value) -> Result<String> {
    parse_status(&Homework::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hw(status: &str) -> Homework {
        Homework {
            homework_name: "hw1".into(),
            status: status.into(),
        }
    }

    #[test]
    fn test_every_verdict_names_homework() {
        for verdict in Verdict::ALL {
            let message = parse_status(&hw(verdict.code())).unwrap();
            assert!(message.contains("\"hw1\""), "{message}");
            assert!(message.ends_with(verdict.text()), "{message}");
        }
    }

    #[test]
    fn test_verdict_texts_are_distinct() {
        assert_ne!(Verdict::Approved.text(), Verdict::Reviewing.text());
        assert_ne!(Verdict::Approved.text(), Verdict::Rejected.text());
        assert_ne!(Verdict::Reviewing.text(), Verdict::Rejected.text());
    }

    #[test]
    fn test_unknown_status() {
        for code in ["", "APPROVED", "done", "approved "] {
            match parse_status(&hw(code)) {
                Err(BotError::UnknownStatus(s)) => assert_eq!(s, code),
                other => panic!("expected UnknownStatus for {code:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_status_value() {
        let message =
            parse_status_value(&json!({"homework_name": "final", "status": "rejected"})).unwrap();
        assert_eq!(
            message,
            "Status of homework \"final\" changed. The work has been reviewed: the reviewer left comments."
        );
    }
}
