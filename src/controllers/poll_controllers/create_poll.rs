use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::DateTime;
use tracing::info;

use crate::controllers::poll_controllers::models::{CreatePollRequest, PollResponse};
use crate::models::poll_models::Poll;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::poll_validator::validate_new_poll;

pub async fn create_poll(
    State(state): State<AppState>,
    payload: Result<Json<CreatePollRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PollResponse>)> {
    let Json(payload) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let new_poll = validate_new_poll(&payload)?;
    let poll = state.store.create(Poll::new(new_poll, DateTime::now())).await?;

    info!(
        poll_id = %poll.id,
        options = poll.options.len(),
        multiple_choice = poll.multiple_choice,
        "poll created"
    );

    Ok((StatusCode::CREATED, Json(poll.into())))
}
