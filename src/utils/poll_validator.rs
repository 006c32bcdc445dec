//! Validation and normalization of poll creation input.
//!
//! The creation endpoint accepts loosely typed JSON: fields of the wrong
//! type are coerced to empty values rather than rejected, and only the
//! normalized result is checked against the poll rules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::controllers::poll_controllers::models::CreatePollRequest;
use crate::utils::error::{AppError, AppResult};

pub const MIN_QUESTION_CHARS: usize = 5;
pub const MIN_OPTIONS: usize = 2;

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
    pub multiple_choice: bool,
    pub closes_at: Option<DateTime<Utc>>,
}

pub fn validate_new_poll(payload: &CreatePollRequest) -> AppResult<NewPoll> {
    let question = match &payload.question {
        Value::String(question) => question.trim().to_string(),
        _ => String::new(),
    };

    if question.chars().count() < MIN_QUESTION_CHARS {
        return Err(AppError::InvalidQuestion);
    }

    let options = normalize_options(&payload.options);
    if options.len() < MIN_OPTIONS {
        return Err(AppError::InsufficientOptions);
    }

    let closes_at = parse_closes_at(&payload.closes_at)?;

    Ok(NewPoll {
        question,
        options,
        multiple_choice: is_truthy(&payload.multiple_choice),
        closes_at,
    })
}

fn normalize_options(options: &Value) -> Vec<String> {
    let Value::Array(options) = options else {
        return Vec::new();
    };

    options
        .iter()
        .map(|option| match option {
            Value::String(text) => text.as_str(),
            _ => option.get("text").and_then(Value::as_str).unwrap_or(""),
        })
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parses the optional closing time of a poll.
///
/// Missing, `null` and blank values mean the poll never closes. Strings may
/// be RFC 3339, `YYYY-MM-DDTHH:MM[:SS[.f]]` without an offset (read as UTC)
/// or a bare `YYYY-MM-DD` (midnight UTC). Numbers are milliseconds since the
/// Unix epoch and must be integers: `1.9e12` or `1700000000000.5` are
/// rejected with `InvalidClosesAt`, as is any other type.
fn parse_closes_at(value: &Value) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => parse_timestamp(text.trim())
            .map(Some)
            .ok_or(AppError::InvalidClosesAt),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(Some)
            .ok_or(AppError::InvalidClosesAt),
        _ => Err(AppError::InvalidClosesAt),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }

    // Values from <input type="datetime-local"> carry no offset.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
}
