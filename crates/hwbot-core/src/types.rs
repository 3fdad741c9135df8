//! Homework data model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Malformed, Result};

/// One reviewed unit of work as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
}

impl Homework {
    /// Extract a record from one entry of the `homeworks` array.
    pub fn from_value(value: &Value) -> Result<Self> {
        let homework_name = value
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or(Malformed::MissingHomeworkName)?;
        let status = value
            .get("status")
            .and_then(Value::as_str)
            .ok_or(Malformed::MissingStatus)?;
        Ok(Self {
            homework_name: homework_name.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let hw = Homework::from_value(&json!({
            "id": 7,
            "homework_name": "hw1",
            "status": "reviewing",
            "reviewer_comment": "",
        }))
        .unwrap();
        assert_eq!(hw.homework_name, "hw1");
        assert_eq!(hw.status, "reviewing");
    }

    #[test]
    fn test_name_checked_before_status() {
        let err = Homework::from_value(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            BotError::MalformedResponse(Malformed::MissingHomeworkName)
        ));
    }

    #[test]
    fn test_missing_status() {
        let err = Homework::from_value(&json!({"homework_name": "hw1"})).unwrap_err();
        assert!(matches!(err, BotError::MalformedResponse(Malformed::MissingStatus)));
    }

    #[test]
    fn test_non_string_status_rejected() {
        let err = Homework::from_value(&json!({"homework_name": "hw1", "status": 3})).unwrap_err();
        assert!(matches!(err, BotError::MalformedResponse(Malformed::MissingStatus)));
    }
}
