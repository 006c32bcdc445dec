use axum::{routing::get, Router};

use crate::controllers::health;
use crate::state::AppState;
use crate::utils::error::AppError;

pub mod poll_routes;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root).fallback(method_not_allowed))
        .route("/api/health", get(health::health).fallback(method_not_allowed))
        .nest("/api/polls", poll_routes::poll_routes())
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub(crate) async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
