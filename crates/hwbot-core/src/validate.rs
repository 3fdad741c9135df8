//! Response validator for the homework status envelope.
//!
//! Expected shape: `{"homeworks": [...], "current_date": <unix ts>}`.

use serde_json::Value;

use crate::error::{Malformed, Result};

/// Check the envelope shape and return its `homeworks` array untouched.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let object = response.as_object().ok_or(Malformed::NotAnObject)?;
    let homeworks = object
        .get("homeworks")
        .ok_or(Malformed::MissingHomeworks)?
        .as_array()
        .ok_or(Malformed::HomeworksNotAList)?;
    if !object.contains_key("current_date") {
        return Err(Malformed::MissingCurrentDate.into());
    }
    Ok(homeworks)
}

/// Cursor for the next poll: `current_date` if it is an integer, else `fallback`.
pub fn next_cursor(response: &Value, fallback: i64) -> i64 {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or(fallback)
}
