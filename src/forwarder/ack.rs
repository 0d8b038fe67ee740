use super::{AckShortfall, CollectorTarget, EventForwarder, ForwardOutcome};
use crate::domain::{AckId, AckRequest, AckStatusResponse, RequestChannel};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{info, warn};
use url::Url;

/// Ack endpoint for a submission made on `channel`.
///
/// The last path segment of the event endpoint is replaced by `ack`
/// (`/services/collector/event` becomes `/services/collector/ack`) and the
/// channel is passed as the only query parameter.
pub fn ack_url(endpoint: &Url, channel: RequestChannel) -> Url {
    let mut url = endpoint.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().pop().push("ack");
    }
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("channel", &channel.to_string());
    url
}

impl EventForwarder {
    pub(super) async fn acknowledge(
        &self,
        target: &CollectorTarget,
        channel: RequestChannel,
        ack_id: AckId,
    ) -> ForwardOutcome {
        let url = ack_url(&target.endpoint, channel);
        let request = AckRequest {
            acks: vec![ack_id.clone()],
        };

        let response = match self
            .client
            .post(url)
            .header(AUTHORIZATION, target.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(channel = %channel, ack_id = %ack_id, "Error sending ack to collector: {e}");
                return ForwardOutcome::DeliveredUnacknowledged {
                    channel,
                    reason: AckShortfall::Transport(e.to_string()),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(
                channel = %channel,
                ack_id = %ack_id,
                "Failed to send ack to collector: {} - {}",
                status,
                body
            );
            return ForwardOutcome::DeliveredUnacknowledged {
                channel,
                reason: AckShortfall::Rejected {
                    status: status.as_u16(),
                    body,
                },
            };
        }

        let indexed = serde_json::from_str::<AckStatusResponse>(&body)
            .ok()
            .and_then(|s| s.status_of(&ack_id));

        if indexed == Some(false) {
            warn!(channel = %channel, ack_id = %ack_id, "Collector has not indexed the event yet");
            return ForwardOutcome::DeliveredUnacknowledged {
                channel,
                reason: AckShortfall::Pending,
            };
        }

        info!(channel = %channel, ack_id = %ack_id, "Event acknowledged by collector");
        ForwardOutcome::Delivered { channel, ack_id }
    }
}
