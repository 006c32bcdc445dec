use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use mongodb::bson::DateTime;

use crate::controllers::poll_controllers::models::{CastVoteRequest, PollResponse};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::vote_processor::record_vote;

pub async fn cast_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> AppResult<Json<PollResponse>> {
    let Json(payload) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let poll = record_vote(
        state.store.as_ref(),
        &poll_id,
        &payload.option_ids,
        DateTime::now(),
    )
    .await?;

    Ok(Json(poll.into()))
}
