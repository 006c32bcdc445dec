use mongodb::bson::DateTime;
use serde_json::Value;
use tracing::info;

use crate::db::poll_store::PollStore;
use crate::models::poll_models::Poll;
use crate::utils::error::{AppError, AppResult};

/// A non-empty set of option ids, in the order they were first given.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteSelection(Vec<String>);

impl VoteSelection {
    pub fn parse(option_ids: &Value) -> AppResult<Self> {
        let invalid =
            || AppError::InvalidRequest("optionIds must be a non-empty array of strings".to_string());

        let Value::Array(values) = option_ids else {
            return Err(invalid());
        };

        let mut ids: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            let id = value.as_str().ok_or_else(invalid)?;
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        if ids.is_empty() {
            return Err(invalid());
        }

        Ok(Self(ids))
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed selection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Closure is checked before cardinality.
pub fn check_vote(poll: &Poll, selection: &VoteSelection, now: DateTime) -> AppResult<()> {
    if poll.is_closed_at(now) {
        return Err(AppError::PollClosed);
    }

    if !poll.multiple_choice && selection.len() > 1 {
        return Err(AppError::CardinalityViolation);
    }

    Ok(())
}

/// Returns how many options were incremented.
pub fn apply_vote(poll: &mut Poll, option_ids: &[String]) -> usize {
    let mut incremented = 0;
    for option in poll.options.iter_mut() {
        if option_ids.contains(&option.id) {
            option.votes = option.votes.saturating_add(1);
            incremented += 1;
        }
    }
    incremented
}

pub async fn record_vote(
    store: &dyn PollStore,
    poll_id: &str,
    option_ids: &Value,
    now: DateTime,
) -> AppResult<Poll> {
    let selection = VoteSelection::parse(option_ids)?;

    let poll = store
        .find_by_id(poll_id)
        .await?
        .ok_or_else(AppError::poll_not_found)?;

    check_vote(&poll, &selection, now)?;

    let updated = store.increment_votes(poll_id, selection.ids(), now).await?;
    info!(
        poll_id = %updated.id,
        options = selection.len(),
        total_votes = updated.total_votes(),
        "vote recorded"
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;
    use crate::db::memory_store::InMemoryPollStore;
    use crate::utils::poll_validator::NewPoll;

    fn new_poll(multiple_choice: bool, closes_at: Option<chrono::DateTime<Utc>>) -> Poll {
        Poll::new(
            NewPoll {
                question: "Best editor?".to_string(),
                options: vec!["Vim".to_string(), "Emacs".to_string(), "Helix".to_string()],
                multiple_choice,
                closes_at,
            },
            DateTime::now(),
        )
    }

    fn votes(poll: &Poll) -> Vec<u32> {
        poll.options.iter().map(|option| option.votes).collect()
    }

    #[test]
    fn selection_must_be_non_empty_array_of_strings() {
        for body in [json!(null), json!("abc"), json!([]), json!(["a", 1]), json!({"0": "a"})] {
            let err = VoteSelection::parse(&body).unwrap_err();
            assert!(matches!(err, AppError::InvalidRequest(_)), "{body}");
        }
    }

    #[test]
    fn selection_collapses_duplicates() {
        let selection = VoteSelection::parse(&json!(["b", "a", "b"])).unwrap();
        assert_eq!(selection.ids(), ["b".to_string(), "a".to_string()]);
        assert_eq!(selection.len(), 2);
        assert!(!selection.is_empty());
    }

    #[test]
    fn closed_poll_is_reported_before_cardinality() {
        let poll = new_poll(false, Some(Utc::now() - Duration::minutes(1)));
        let selection = VoteSelection::parse(&json!([
            poll.options[0].id.clone(),
            poll.options[1].id.clone()
        ]))
        .unwrap();

        let err = check_vote(&poll, &selection, DateTime::now()).unwrap_err();
        assert!(matches!(err, AppError::PollClosed));
    }

    #[test]
    fn single_choice_rejects_multiple_ids() {
        let poll = new_poll(false, None);
        let selection = VoteSelection::parse(&json!([
            poll.options[0].id.clone(),
            poll.options[1].id.clone()
        ]))
        .unwrap();

        let err = check_vote(&poll, &selection, DateTime::now()).unwrap_err();
        assert!(matches!(err, AppError::CardinalityViolation));

        let multi = new_poll(true, None);
        assert!(check_vote(&multi, &selection, DateTime::now()).is_ok());
    }

    #[test]
    fn apply_vote_ignores_unknown_ids() {
        let mut poll = new_poll(true, None);
        let ids = vec![poll.options[2].id.clone(), "unknown".to_string()];

        assert_eq!(apply_vote(&mut poll, &ids), 1);
        assert_eq!(votes(&poll), vec![0, 0, 1]);
    }

    #[tokio::test]
    async fn rejected_votes_leave_counts_unchanged() {
        let store = InMemoryPollStore::new();
        let single = store.create(new_poll(false, None)).await.unwrap();
        let closed = store
            .create(new_poll(true, Some(Utc::now() - Duration::hours(1))))
            .await
            .unwrap();

        let both = json!([single.options[0].id.clone(), single.options[1].id.clone()]);
        let err = record_vote(&store, &single.id.to_hex(), &both, DateTime::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CardinalityViolation));

        let one = json!([closed.options[0].id.clone()]);
        let err = record_vote(&store, &closed.id.to_hex(), &one, DateTime::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PollClosed));

        for poll in [single, closed] {
            let stored = store.find_by_id(&poll.id.to_hex()).await.unwrap().unwrap();
            assert_eq!(votes(&stored), vec![0, 0, 0]);
        }
    }

    #[tokio::test]
    async fn invalid_request_wins_over_missing_poll() {
        let store = InMemoryPollStore::new();
        let err = record_vote(&store, "missing", &json!([]), DateTime::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = record_vote(&store, "missing", &json!(["a"]), DateTime::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_option_succeeds_without_effect() {
        let store = InMemoryPollStore::new();
        let poll = store.create(new_poll(false, None)).await.unwrap();

        let updated = record_vote(&store, &poll.id.to_hex(), &json!(["nope"]), DateTime::now())
            .await
            .unwrap();
        assert_eq!(votes(&updated), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn multiple_choice_increments_each_selected_option_once() {
        let store = InMemoryPollStore::new();
        let poll = store.create(new_poll(true, None)).await.unwrap();
        let body = json!([
            poll.options[0].id.clone(),
            poll.options[2].id.clone(),
            poll.options[0].id.clone()
        ]);

        let updated = record_vote(&store, &poll.id.to_hex(), &body, DateTime::now())
            .await
            .unwrap();
        assert_eq!(votes(&updated), vec![1, 0, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_add_exactly_n() {
        let store = Arc::new(InMemoryPollStore::new());
        let poll = store.create(new_poll(false, None)).await.unwrap();
        let poll_id = poll.id.to_hex();
        let body = json!([poll.options[1].id.clone()]);

        let mut handles = Vec::new();
        for _ in 0..100 {
            let store = Arc::clone(&store);
            let poll_id = poll_id.clone();
            let body = body.clone();
            handles.push(tokio::spawn(async move {
                record_vote(store.as_ref(), &poll_id, &body, DateTime::now()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.find_by_id(&poll_id).await.unwrap().unwrap();
        assert_eq!(votes(&stored), vec![0, 100, 0]);
    }
}
