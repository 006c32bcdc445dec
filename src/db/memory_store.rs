use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

use crate::db::poll_store::PollStore;
use crate::models::poll_models::Poll;
use crate::utils::error::{AppError, AppResult};
use crate::utils::vote_processor::apply_vote;

/// Keeps polls in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPollStore {
    polls: RwLock<HashMap<ObjectId, Poll>>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn create(&self, poll: Poll) -> AppResult<Poll> {
        let mut polls = self.polls.write().await;
        if polls.contains_key(&poll.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate poll id {}",
                poll.id
            )));
        }

        polls.insert(poll.id, poll.clone());
        Ok(poll)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Poll>> {
        let Ok(obj_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        Ok(self.polls.read().await.get(&obj_id).cloned())
    }

    async fn list(&self, filter: Option<&str>) -> AppResult<Vec<Poll>> {
        let needle = filter
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut polls: Vec<Poll> = self
            .polls
            .read()
            .await
            .values()
            .filter(|poll| match &needle {
                Some(needle) => poll.question.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(polls)
    }

    async fn save(&self, poll: &Poll) -> AppResult<Poll> {
        let mut polls = self.polls.write().await;
        let stored = polls.get_mut(&poll.id).ok_or_else(AppError::poll_not_found)?;

        *stored = poll.clone();
        Ok(poll.clone())
    }

    async fn increment_votes(
        &self,
        id: &str,
        option_ids: &[String],
        now: DateTime,
    ) -> AppResult<Poll> {
        let obj_id = ObjectId::parse_str(id).map_err(|_| AppError::poll_not_found())?;

        // The write lock spans the whole read-modify-write.
        let mut polls = self.polls.write().await;
        let poll = polls.get_mut(&obj_id).ok_or_else(AppError::poll_not_found)?;

        if poll.is_closed_at(now) {
            return Err(AppError::PollClosed);
        }

        apply_vote(poll, option_ids);
        Ok(poll.clone())
    }
}
