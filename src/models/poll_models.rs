use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::poll_validator::NewPoll;

/// A poll as stored in the `polls` collection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub multiple_choice: bool,
    pub created_at: DateTime,
    pub closes_at: Option<DateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

impl Poll {
    pub fn new(new_poll: NewPoll, now: DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            question: new_poll.question,
            options: new_poll
                .options
                .into_iter()
                .map(|text| PollOption {
                    id: ObjectId::new().to_hex(),
                    text,
                    votes: 0,
                })
                .collect(),
            multiple_choice: new_poll.multiple_choice,
            created_at: now,
            closes_at: new_poll.closes_at.map(DateTime::from_chrono),
        }
    }

    /// A poll with no `closes_at` never closes.
    pub fn is_closed_at(&self, now: DateTime) -> bool {
        self.closes_at.is_some_and(|closes_at| now > closes_at)
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|option| u64::from(option.votes)).sum()
    }
}
