use crate::config::Config;
use crate::error::RelayError;
use crate::forwarder::EventForwarder;
use crate::gate::ContentGate;
use crate::port::EventSink;
use std::sync::Arc;
use tracing::info;

/// Shared application state: where events go, what guards them, and the
/// source label for events that do not name one.
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn EventSink>,
    pub gate: Arc<ContentGate>,
    pub default_source: Arc<str>,
}

impl AppState {
    pub fn new(
        sink: Arc<dyn EventSink>,
        gate: Arc<ContentGate>,
        default_source: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            sink,
            gate,
            default_source: default_source.into(),
        }
    }

    /// Build the production forwarder and gate from configuration.
    ///
    /// TLS material and the wordlist file are read here, once.
    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        let collector = config.collector()?;
        let forwarder = EventForwarder::new(&collector)?;
        match forwarder.endpoint() {
            Some(endpoint) => info!(endpoint = %endpoint, host = %collector.host, "Forwarding to collector"),
            None => info!("Collector not configured; events will be dropped"),
        }

        let gate = ContentGate::from_config(&config.gate()?)?;
        info!(layers = ?gate.layer_names(), "Content gate ready");

        Ok(Self::new(
            Arc::new(forwarder),
            Arc::new(gate),
            config.default_source.as_str(),
        ))
    }
}
