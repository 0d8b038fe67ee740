use super::error::EventValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message payload of an event: free text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventMessage {
    Text(String),
    Record(Map<String, Value>),
}

impl EventMessage {
    /// Text the content gate inspects.
    ///
    /// For records this is every key and string leaf (nested objects and
    /// arrays included) joined by single spaces.
    pub fn gate_text(&self) -> String {
        match self {
            EventMessage::Text(text) => text.clone(),
            EventMessage::Record(record) => {
                let mut parts = Vec::new();
                collect_object(record, &mut parts);
                parts.join(" ")
            }
        }
    }
}

fn collect_object<'a>(map: &'a Map<String, Value>, out: &mut Vec<&'a str>) {
    for (key, value) in map {
        out.push(key);
        collect_strings(value, out);
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(text) => out.push(text),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        Value::Object(map) => collect_object(map, out),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// An event as submitted to `POST /log`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub source: String,
    pub message: EventMessage,
}

impl LogEvent {
    pub fn new(source: impl Into<String>, message: EventMessage) -> Self {
        Self {
            source: source.into(),
            message,
        }
    }

    pub fn text(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, EventMessage::Text(text.into()))
    }

    /// Parse a `{source?, message}` request body.
    ///
    /// A missing, null or blank `source` falls back to `default_source`.
    pub fn from_request_body(body: &str, default_source: &str) -> Result<Self, EventValidationError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| EventValidationError::Malformed(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(EventValidationError::NotAnObject);
        };

        let message = match fields.remove("message") {
            Some(Value::String(text)) => EventMessage::Text(text),
            Some(Value::Object(record)) => EventMessage::Record(record),
            Some(other) => return Err(EventValidationError::UnsupportedMessage(json_kind(&other))),
            None => return Err(EventValidationError::MissingMessage),
        };

        let source = match fields.remove("source") {
            Some(Value::String(source)) if !source.trim().is_empty() => source,
            Some(Value::String(_) | Value::Null) | None => default_source.to_string(),
            Some(other) => return Err(EventValidationError::InvalidSource(json_kind(&other))),
        };

        Ok(Self { source, message })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
