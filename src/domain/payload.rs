use super::log_event::{EventMessage, LogEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// HEC format tag for JSON event bodies.
pub const JSON_SOURCETYPE: &str = "_json";

/// Body of one HEC event submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorPayload {
    pub host: String,
    pub source: String,
    pub sourcetype: String,
    pub event: Map<String, Value>,
}

impl CollectorPayload {
    /// Text messages are wrapped as `event.message`; records become the
    /// event body as-is.
    pub fn build(host: &str, event: &LogEvent) -> Self {
        let body = match &event.message {
            EventMessage::Text(text) => {
                let mut body = Map::new();
                body.insert("message".to_string(), Value::String(text.clone()));
                body
            }
            EventMessage::Record(record) => record.clone(),
        };

        Self {
            host: host.to_string(),
            source: event.source.clone(),
            sourcetype: JSON_SOURCETYPE.to_string(),
            event: body,
        }
    }
}

/// Opaque acknowledgment id handed back by the collector.
///
/// Splunk returns integers, but nothing about the handshake depends on that,
/// so string ids are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AckId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for AckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckId::Numeric(id) => write!(f, "{id}"),
            AckId::Text(id) => f.write_str(id),
        }
    }
}

/// Response body of a successful event submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, rename = "ackId")]
    pub ack_id: Option<AckId>,
}

/// Body of the ack call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckRequest {
    pub acks: Vec<AckId>,
}

/// Response of the ack call: `{"acks": {"<id>": true|false}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckStatusResponse {
    #[serde(default)]
    pub acks: HashMap<String, bool>,
}

impl AckStatusResponse {
    /// `Some(false)` only when the collector explicitly reports the id as not
    /// yet indexed.
    pub fn status_of(&self, id: &AckId) -> Option<bool> {
        self.acks.get(&id.to_string()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_is_wrapped() {
        let event = LogEvent::text("client", "hello world");
        let payload = CollectorPayload::build("render-app", &event);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "host": "render-app",
                "source": "client",
                "sourcetype": "_json",
                "event": {"message": "hello world"}
            })
        );
    }

    #[test]
    fn test_record_message_is_merged_into_event() {
        let record = json!({"action": "click", "x": 10}).as_object().unwrap().clone();
        let event = LogEvent::new("ui", EventMessage::Record(record));
        let payload = CollectorPayload::build("relay", &event);
        assert_eq!(payload.event.get("action"), Some(&json!("click")));
        assert_eq!(payload.event.get("x"), Some(&json!(10)));
        assert!(payload.event.get("message").is_none());
    }

    #[test]
    fn test_submit_response_ack_id_variants() {
        let numeric: SubmitResponse =
            serde_json::from_str(r#"{"text":"Success","code":0,"ackId":0}"#).unwrap();
        assert_eq!(numeric.ack_id, Some(AckId::Numeric(0)));

        let text: SubmitResponse = serde_json::from_str(r#"{"ackId":"a-17"}"#).unwrap();
        assert_eq!(text.ack_id, Some(AckId::Text("a-17".into())));

        let absent: SubmitResponse = serde_json::from_str(r#"{"text":"Success","code":0}"#).unwrap();
        assert_eq!(absent.ack_id, None);

        let null: SubmitResponse = serde_json::from_str(r#"{"ackId":null}"#).unwrap();
        assert_eq!(null.ack_id, None);
    }

    #[test]
    fn test_ack_request_shape() {
        let body = serde_json::to_value(AckRequest {
            acks: vec![AckId::Numeric(7)],
        })
        .unwrap();
        assert_eq!(body, json!({"acks": [7]}));
    }

    #[test]
    fn test_ack_status_lookup() {
        let status: AckStatusResponse =
            serde_json::from_str(r#"{"acks":{"7":true,"8":false}}"#).unwrap();
        assert_eq!(status.status_of(&AckId::Numeric(7)), Some(true));
        assert_eq!(status.status_of(&AckId::Numeric(8)), Some(false));
        assert_eq!(status.status_of(&AckId::Numeric(9)), None);
    }
}
