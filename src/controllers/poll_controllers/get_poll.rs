use axum::{
    extract::{Path, State},
    Json,
};

use crate::controllers::poll_controllers::models::PollResponse;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn get_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<PollResponse>> {
    let poll = state
        .store
        .find_by_id(&poll_id)
        .await?
        .ok_or_else(AppError::poll_not_found)?;

    Ok(Json(poll.into()))
}
