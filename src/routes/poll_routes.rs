use axum::{
    routing::{get, patch},
    Router,
};

use crate::controllers::poll_controllers::{cast_vote, create_poll, get_poll, polls};
use crate::routes::method_not_allowed;
use crate::state::AppState;

pub fn poll_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(polls::get_all_polls)
                .post(create_poll::create_poll)
                .fallback(method_not_allowed),
        )
        .route("/:pollId", get(get_poll::get_poll).fallback(method_not_allowed))
        .route(
            "/:pollId/vote",
            patch(cast_vote::cast_vote).fallback(method_not_allowed),
        )
}
