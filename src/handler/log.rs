use crate::app::state::AppState;
use crate::domain::LogEvent;
use crate::error::ApiError;
use crate::forwarder::ForwardOutcome;
use crate::gate::GateVerdict;
use axum::Json;
use axum::extract::State;
use tracing::{debug, info, warn};

use super::StatusBody;

/// Handler for POST /log
///
/// Validate, gate, forward. The gate is not consulted for an invalid body and
/// the collector is not contacted for a rejected message.
pub async fn log_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StatusBody>, ApiError> {
    debug!("Received log request with body length: {}", body.len());

    let event = LogEvent::from_request_body(&body, &state.default_source)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match state.gate.evaluate(&event.message.gate_text()).await {
        GateVerdict::Approved => {}
        GateVerdict::Blocked { layer, reason } => {
            return Err(ApiError::GateRejected { layer, reason });
        }
        GateVerdict::CheckFailed { layer, detail } => {
            return Err(ApiError::CheckFailed { layer, detail });
        }
    }

    let source = event.source.clone();
    match state.sink.forward(event).await {
        ForwardOutcome::Delivered { channel, ack_id } => {
            info!(source = %source, channel = %channel, ack_id = %ack_id, "Event forwarded");
            Ok(Json(StatusBody::success()))
        }
        ForwardOutcome::DeliveredUnacknowledged { channel, reason } => {
            warn!(source = %source, channel = %channel, reason = ?reason, "Event forwarded without acknowledgment");
            Ok(Json(StatusBody::success()))
        }
        ForwardOutcome::ForwardFailed { status, detail } => {
            Err(ApiError::Forward { status, detail })
        }
        ForwardOutcome::Misconfigured => Err(ApiError::Misconfigured),
    }
}
