use crate::config::ConfigError;
use crate::forwarder::ForwarderError;
use crate::gate::GateError;
use crate::handler::StatusBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that stop the relay from starting or serving.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build collector client: {0}")]
    Forwarder(#[from] ForwarderError),

    #[error("Failed to build content gate: {0}")]
    Gate(#[from] GateError),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Request-level failures of the `/log` route.
///
/// The `Display` text is what the client sees in the `message` field; the
/// remaining fields only reach the logs.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON")]
    Validation(String),

    #[error("Your message contains inappropriate language.")]
    GateRejected { layer: &'static str, reason: String },

    #[error("Content check failed")]
    CheckFailed { layer: &'static str, detail: String },

    #[error("Log collector is not configured")]
    Misconfigured,

    #[error("Failed to forward event to log collector")]
    Forward { status: Option<u16>, detail: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::GateRejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::CheckFailed { .. } | ApiError::Misconfigured | ApiError::Forward { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::GateRejected { .. } => "GATE_REJECTED",
            ApiError::CheckFailed { .. } => "CHECK_FAILED",
            ApiError::Misconfigured => "MISCONFIGURED",
            ApiError::Forward { .. } => "TRANSPORT_FAILURE",
        }
    }

    /// Log this error at a level matching its status class.
    pub fn log(&self) {
        let code = self.error_code();
        match self {
            ApiError::Validation(detail) => {
                tracing::debug!(error_code = %code, detail = %detail, "Rejected invalid log request");
            }
            ApiError::GateRejected { layer, reason } => {
                tracing::info!(error_code = %code, layer = %layer, reason = %reason, "Message blocked by content gate");
            }
            ApiError::CheckFailed { layer, detail } => {
                tracing::error!(error_code = %code, layer = %layer, detail = %detail, "Content check failed");
            }
            ApiError::Misconfigured => {
                tracing::error!(error_code = %code, "Collector endpoint or token missing");
            }
            ApiError::Forward { status, detail } => {
                tracing::error!(error_code = %code, status = ?status, detail = %detail, "Event was not accepted by collector");
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(StatusBody::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_bad_request() {
        assert_eq!(
            ApiError::Validation("missing message".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        let rejected = ApiError::GateRejected {
            layer: "lexicon",
            reason: "blocked term".into(),
        };
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            rejected.to_string(),
            "Your message contains inappropriate language."
        );
    }

    #[test]
    fn test_server_faults_map_to_internal_error() {
        let failed = ApiError::CheckFailed {
            layer: "toxicity",
            detail: "model offline".into(),
        };
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::Misconfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let forward = ApiError::Forward {
            status: Some(503),
            detail: "busy".into(),
        };
        assert_eq!(forward.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(forward.error_code(), "TRANSPORT_FAILURE");
    }

    #[test]
    fn test_validation_message_hides_detail() {
        let err = ApiError::Validation("expected value at line 1".into());
        assert_eq!(err.to_string(), "Invalid JSON");
    }
}
