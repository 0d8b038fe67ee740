use super::{Config, ConfigError};
use url::Url;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(raw) = &self.hec_url {
            validate_http_url("HEC URL", raw)?;
        }

        // A partial collector setup is allowed: the forwarder degrades to a
        // no-op that reports `Misconfigured` on every call.
        match (&self.hec_url, &self.hec_token) {
            (Some(_), None) => {
                tracing::warn!("SPLUNK_HEC_URL is set but no HEC token is configured");
            }
            (None, Some(_)) => {
                tracing::warn!("HEC token is set but SPLUNK_HEC_URL is not configured");
            }
            _ => {}
        }

        if let Some(raw) = &self.toxicity_endpoint {
            validate_http_url("toxicity endpoint", raw)?;
        }

        if self.auth_scheme.trim().is_empty() || self.auth_scheme.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidConfig(format!(
                "Auth scheme must be a single non-empty word, got '{}'",
                self.auth_scheme
            )));
        }

        if self.default_source.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Default source cannot be empty".to_string(),
            ));
        }

        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err(ConfigError::InvalidConfig(
                "Client certificate and client key must be configured together".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.http_port == 0 {
            return Err(ConfigError::InvalidConfig("Port cannot be 0".to_string()));
        }

        validate_threshold("Toxicity threshold", self.toxicity_threshold)?;
        validate_threshold("Fuzzy threshold", self.fuzzy_threshold)?;

        Ok(())
    }
}

fn validate_http_url(label: &str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {label} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!(
            "Invalid {label} '{raw}': unsupported scheme '{other}'"
        ))),
    }
}

/// Thresholds are probabilities/similarities in (0, 1].
fn validate_threshold(label: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err(ConfigError::InvalidConfig(format!(
            "{label} must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}
