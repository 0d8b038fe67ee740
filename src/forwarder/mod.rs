//! Splunk HEC client: event submission plus the indexer-acknowledgment
//! handshake.
//!
//! One `forward` call is one attempt. Nothing is retried; an ack that fails
//! or never arrives is logged and reported, not escalated.

mod ack;
pub mod client;

use crate::config::CollectorConfig;
use crate::domain::{AckId, CollectorPayload, LogEvent, RequestChannel, SubmitResponse};
use crate::port::EventSink;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

pub use ack::ack_url;
pub use client::build_http_client;

/// Header carrying the request channel on event submissions.
pub const CHANNEL_HEADER: &str = "X-Splunk-Request-Channel";

#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Failed to read TLS material {}: {source}", path.display())]
    TlsMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TLS material {}: {source}", path.display())]
    InvalidTls {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("No certificates found in {}", path.display())]
    EmptyBundle { path: PathBuf },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// Why a delivered event is not known to be durably queued.
#[derive(Debug, Clone, PartialEq)]
pub enum AckShortfall {
    /// The submission response carried no `ackId`.
    Missing,
    /// The ack call was answered with a non-2xx status.
    Rejected { status: u16, body: String },
    /// The ack call never got a response.
    Transport(String),
    /// The collector answered the ack call but reported the id as not yet indexed.
    Pending,
}

/// Result of one forward attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    /// Submitted and acknowledged.
    Delivered {
        channel: RequestChannel,
        ack_id: AckId,
    },
    /// Submitted (2xx) but the ack handshake did not confirm it.
    DeliveredUnacknowledged {
        channel: RequestChannel,
        reason: AckShortfall,
    },
    /// The submission itself failed. `status` is `None` for transport errors.
    ForwardFailed { status: Option<u16>, detail: String },
    /// Endpoint or token missing; no request was made.
    Misconfigured,
}

impl ForwardOutcome {
    /// The collector accepted the submission.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            ForwardOutcome::Delivered { .. } | ForwardOutcome::DeliveredUnacknowledged { .. }
        )
    }

    pub fn channel(&self) -> Option<RequestChannel> {
        match self {
            ForwardOutcome::Delivered { channel, .. }
            | ForwardOutcome::DeliveredUnacknowledged { channel, .. } => Some(*channel),
            ForwardOutcome::ForwardFailed { .. } | ForwardOutcome::Misconfigured => None,
        }
    }
}

/// Resolved collector address and credentials.
struct CollectorTarget {
    endpoint: Url,
    authorization: HeaderValue,
}

pub struct EventForwarder {
    client: Client,
    target: Option<CollectorTarget>,
    host: String,
    timeout: Duration,
}

impl EventForwarder {
    pub fn new(config: &CollectorConfig) -> Result<Self, ForwarderError> {
        let client = build_http_client(&config.tls, config.timeout)?;

        let target = match (&config.endpoint, &config.token) {
            (Some(endpoint), Some(token)) => {
                let mut authorization =
                    HeaderValue::from_str(&format!("{} {}", config.auth_scheme, token)).map_err(
                        |e| ForwarderError::InvalidHeader(format!("Invalid HEC token: {e}")),
                    )?;
                authorization.set_sensitive(true);
                Some(CollectorTarget {
                    endpoint: endpoint.clone(),
                    authorization,
                })
            }
            _ => {
                warn!("Splunk HEC URL or token not configured; events will not be forwarded");
                None
            }
        };

        Ok(Self {
            client,
            target,
            host: config.host.clone(),
            timeout: config.timeout,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.target.as_ref().map(|t| &t.endpoint)
    }

    /// Submit one event and, when the collector hands back an ack id,
    /// acknowledge it on the same channel.
    pub async fn forward(&self, event: &LogEvent) -> ForwardOutcome {
        let Some(target) = &self.target else {
            warn!(
                source = %event.source,
                "Splunk HEC URL or token not configured; event dropped"
            );
            return ForwardOutcome::Misconfigured;
        };

        let channel = RequestChannel::generate();
        let payload = CollectorPayload::build(&self.host, event);
        let start = Instant::now();

        debug!(channel = %channel, source = %event.source, "Submitting event to collector");

        let response = match self
            .client
            .post(target.endpoint.clone())
            .header(AUTHORIZATION, target.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(CHANNEL_HEADER, channel.to_string())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(channel = %channel, "Error sending log to collector: {e}");
                return ForwardOutcome::ForwardFailed {
                    status: None,
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            warn!(channel = %channel, "Failed to read collector response body: {e}");
            String::new()
        });

        if !status.is_success() {
            error!(
                channel = %channel,
                status = status.as_u16(),
                "Failed to send log to collector: {} - {}",
                status,
                body
            );
            return ForwardOutcome::ForwardFailed {
                status: Some(status.as_u16()),
                detail: body,
            };
        }

        info!(
            channel = %channel,
            status = status.as_u16(),
            "Event accepted by collector in {:?}",
            start.elapsed()
        );

        let ack_id = serde_json::from_str::<SubmitResponse>(&body)
            .ok()
            .and_then(|r| r.ack_id);

        match ack_id {
            Some(ack_id) => self.acknowledge(target, channel, ack_id).await,
            None => {
                warn!(channel = %channel, "No ackId in response from collector");
                ForwardOutcome::DeliveredUnacknowledged {
                    channel,
                    reason: AckShortfall::Missing,
                }
            }
        }
    }
}

impl EventSink for EventForwarder {
    fn forward(&self, event: LogEvent) -> Pin<Box<dyn Future<Output = ForwardOutcome> + Send + '_>> {
        Box::pin(async move { EventForwarder::forward(self, &event).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use tracing_test::traced_test;

    fn unconfigured() -> CollectorConfig {
        CollectorConfig {
            endpoint: None,
            token: None,
            auth_scheme: "Splunk".into(),
            host: "relay".into(),
            timeout: Duration::from_secs(1),
            tls: TlsConfig::default(),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unconfigured_forwarder_reports_misconfigured() {
        let forwarder = EventForwarder::new(&unconfigured()).unwrap();
        assert!(!forwarder.is_configured());

        let outcome = forwarder.forward(&LogEvent::text("client", "hello")).await;
        assert_eq!(outcome, ForwardOutcome::Misconfigured);
        assert!(logs_contain("event dropped"));
    }

    #[tokio::test]
    async fn test_token_without_endpoint_is_misconfigured() {
        let config = CollectorConfig {
            token: Some("token".into()),
            ..unconfigured()
        };
        let forwarder = EventForwarder::new(&config).unwrap();
        assert_eq!(
            forwarder.forward(&LogEvent::text("client", "x")).await,
            ForwardOutcome::Misconfigured
        );
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = CollectorConfig {
            endpoint: Some(Url::parse("http://localhost:8088/services/collector/event").unwrap()),
            token: Some("bad\ntoken".into()),
            ..unconfigured()
        };
        assert!(matches!(
            EventForwarder::new(&config),
            Err(ForwarderError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_forward_failed() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = CollectorConfig {
            endpoint: Some(Url::parse("http://127.0.0.1:9/services/collector/event").unwrap()),
            token: Some("token".into()),
            ..unconfigured()
        };
        let forwarder = EventForwarder::new(&config).unwrap();
        match forwarder.forward(&LogEvent::text("client", "x")).await {
            ForwardOutcome::ForwardFailed { status, detail } => {
                assert_eq!(status, None);
                assert!(!detail.is_empty());
            }
            other => panic!("expected ForwardFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_helpers() {
        let channel = RequestChannel::generate();
        let delivered = ForwardOutcome::Delivered {
            channel,
            ack_id: AckId::Numeric(1),
        };
        assert!(delivered.is_delivered());
        assert_eq!(delivered.channel(), Some(channel));

        let unacked = ForwardOutcome::DeliveredUnacknowledged {
            channel,
            reason: AckShortfall::Missing,
        };
        assert!(unacked.is_delivered());

        assert!(!ForwardOutcome::Misconfigured.is_delivered());
        assert_eq!(ForwardOutcome::Misconfigured.channel(), None);
    }
}
