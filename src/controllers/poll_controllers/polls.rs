use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::debug;

use crate::controllers::poll_controllers::models::{ListPollsQuery, PollResponse};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn get_all_polls(
    State(state): State<AppState>,
    query: Result<Query<ListPollsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<PollResponse>>> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let polls = state.store.list(query.q.as_deref()).await?;
    debug!(count = polls.len(), filter = ?query.q, "polls listed");

    Ok(Json(polls.into_iter().map(PollResponse::from).collect()))
}
