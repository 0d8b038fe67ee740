use crate::app::state::AppState;
use crate::domain::LogEvent;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::{debug, info};

/// Source label of events the relay emits about itself.
pub const SERVICE_SOURCE: &str = "rask-hec-relay";

const GREETING: &str = "Hello from the rask HEC relay!";

/// Handler for GET /
pub async fn home_handler(State(state): State<AppState>, headers: HeaderMap) -> &'static str {
    let client = client_address(&headers);
    info!(client = %client, "Homepage visited");

    let outcome = state
        .sink
        .forward(LogEvent::text(
            SERVICE_SOURCE,
            format!("Homepage visited from {client}"),
        ))
        .await;
    debug!(delivered = outcome.is_delivered(), "Homepage visit forwarded");

    GREETING
}

/// First hop of `X-Forwarded-For`, or `unknown`.
fn client_address(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
