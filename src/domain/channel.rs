use std::fmt;
use uuid::Uuid;

/// Per-submission correlation token sent as `X-Splunk-Request-Channel` and
/// echoed as the `channel` query parameter of the ack call.
///
/// A fresh v4 UUID is drawn for every forwarding attempt. Nothing keeps track
/// of issued channels; uniqueness is probabilistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestChannel(Uuid);

impl RequestChannel {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RequestChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_channels_are_distinct() {
        let channels: HashSet<RequestChannel> =
            (0..1000).map(|_| RequestChannel::generate()).collect();
        assert_eq!(channels.len(), 1000);
    }

    #[test]
    fn test_display_is_hyphenated_uuid() {
        let channel = RequestChannel::generate();
        let rendered = channel.to_string();
        assert_eq!(rendered.len(), 36);
        assert_eq!(Uuid::parse_str(&rendered).unwrap(), channel.as_uuid());
    }
}
