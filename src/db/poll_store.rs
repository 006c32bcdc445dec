//! Persistence abstraction for polls.
//!
//! Supports two backends:
//! - `mongo`: the `polls` collection of a MongoDB database
//! - `memory`: an in-process map, used when no connection string is set

use async_trait::async_trait;
use mongodb::bson::DateTime;

use crate::models::poll_models::Poll;
use crate::utils::error::AppResult;

#[async_trait]
pub trait PollStore: Send + Sync {
    /// Insert a freshly built poll.
    async fn create(&self, poll: Poll) -> AppResult<Poll>;

    /// Ids that are not valid ObjectIds resolve to `None`.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Poll>>;

    /// Newest first. `filter` is a case-insensitive literal substring of the question.
    async fn list(&self, filter: Option<&str>) -> AppResult<Vec<Poll>>;

    /// Persist the full document state of an existing poll.
    async fn save(&self, poll: &Poll) -> AppResult<Poll>;

    /// Add one vote to every option of the poll whose id is in `option_ids`,
    /// as a single atomic update.
    ///
    /// Fails with `NotFound` if the poll does not exist and `PollClosed` if
    /// it is closed at `now`. Unknown option ids are ignored.
    async fn increment_votes(&self, id: &str, option_ids: &[String], now: DateTime)
        -> AppResult<Poll>;
}
