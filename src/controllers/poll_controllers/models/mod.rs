use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::poll_models::{Poll, PollOption};

/// Fields are kept untyped so the validator can coerce them.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub multiple_choice: Value,
    #[serde(default)]
    pub closes_at: Value,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(default)]
    pub option_ids: Value,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListPollsQuery {
    pub q: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOptionResponse>,
    pub multiple_choice: bool,
    pub created_at: DateTime<Utc>,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PollOptionResponse {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

impl From<PollOption> for PollOptionResponse {
    fn from(option: PollOption) -> Self {
        Self {
            id: option.id,
            text: option.text,
            votes: option.votes,
        }
    }
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        Self {
            id: poll.id.to_hex(),
            question: poll.question,
            options: poll.options.into_iter().map(Into::into).collect(),
            multiple_choice: poll.multiple_choice,
            created_at: poll.created_at.to_chrono(),
            closes_at: poll.closes_at.map(|closes_at| closes_at.to_chrono()),
        }
    }
}
