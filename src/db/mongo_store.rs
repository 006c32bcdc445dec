use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::{debug, info};

use crate::db::poll_store::PollStore;
use crate::models::poll_models::Poll;
use crate::utils::error::{AppError, AppResult};

pub const POLLS_COLLECTION: &str = "polls";

pub struct MongoPollStore {
    polls: Collection<Poll>,
}

impl MongoPollStore {
    pub fn new(db: &Database) -> Self {
        Self {
            polls: db.collection::<Poll>(POLLS_COLLECTION),
        }
    }

    /// Backs the newest-first listing.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(newest_first())
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.polls.create_index(index).await?;
        info!(collection = POLLS_COLLECTION, "indexes ensured");
        Ok(())
    }
}

fn question_filter(filter: Option<&str>) -> Document {
    match filter.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => doc! {
            "question": { "$regex": regex::escape(q), "$options": "i" }
        },
        None => doc! {},
    }
}

/// Newest first, ties broken by id like the in-memory store.
fn newest_first() -> Document {
    doc! { "createdAt": -1, "_id": -1 }
}

/// Matches the poll only while it is open at `now`. A poll is still open at
/// exactly `closesAt`, the same boundary as `Poll::is_closed_at`.
fn open_poll_filter(obj_id: ObjectId, now: DateTime) -> Document {
    doc! {
        "_id": obj_id,
        "$or": [
            { "closesAt": null },
            { "closesAt": { "$gte": now } },
        ],
    }
}

fn vote_update() -> Document {
    doc! {
        "$inc": { "options.$[selected].votes": 1 }
    }
}

/// Binds `selected` in `vote_update` to the chosen options.
fn selected_options(option_ids: &[String]) -> Vec<Document> {
    vec![doc! { "selected.id": { "$in": option_ids.to_vec() } }]
}

#[async_trait]
impl PollStore for MongoPollStore {
    async fn create(&self, poll: Poll) -> AppResult<Poll> {
        self.polls.insert_one(&poll).await?;
        Ok(poll)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Poll>> {
        let Ok(obj_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        Ok(self.polls.find_one(doc! { "_id": obj_id }).await?)
    }

    async fn list(&self, filter: Option<&str>) -> AppResult<Vec<Poll>> {
        let cursor = self
            .polls
            .find(question_filter(filter))
            .sort(newest_first())
            .await?;

        let polls: Vec<Poll> = cursor.try_collect().await?;
        Ok(polls)
    }

    async fn save(&self, poll: &Poll) -> AppResult<Poll> {
        let result = self
            .polls
            .replace_one(doc! { "_id": poll.id }, poll)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::poll_not_found());
        }

        Ok(poll.clone())
    }

    async fn increment_votes(
        &self,
        id: &str,
        option_ids: &[String],
        now: DateTime,
    ) -> AppResult<Poll> {
        let obj_id = ObjectId::parse_str(id).map_err(|_| AppError::poll_not_found())?;

        // The closing check is repeated inside the update so a poll cannot
        // close between the caller's read and this write.
        let updated = self
            .polls
            .find_one_and_update(open_poll_filter(obj_id, now), vote_update())
            .array_filters(selected_options(option_ids))
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(poll) => {
                debug!(poll_id = %poll.id, selected = option_ids.len(), "votes incremented");
                Ok(poll)
            }
            None => match self.polls.find_one(doc! { "_id": obj_id }).await? {
                Some(_) => Err(AppError::PollClosed),
                None => Err(AppError::poll_not_found()),
            },
        }
    }
}
