use crate::app::state::AppState;
use crate::domain::LogEvent;
use crate::handler::home::SERVICE_SOURCE;
use axum::extract::State;
use tracing::debug;

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> &'static str {
    debug!("Health check requested");
    let outcome = state
        .sink
        .forward(LogEvent::text(SERVICE_SOURCE, "Health check endpoint hit"))
        .await;
    debug!(delivered = outcome.is_delivered(), "Health visit forwarded");
    "OK"
}
