use super::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::home::home_handler;
use crate::handler::log::log_handler;
use axum::Router;
use axum::routing::{get, post};

/// Build the relay's HTTP router.
pub fn relay_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/log", post(log_handler))
        .with_state(state)
}
