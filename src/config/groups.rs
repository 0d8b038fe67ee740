use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Everything the forwarder needs, resolved once at startup.
#[derive(Clone)]
pub struct CollectorConfig {
    pub endpoint: Option<Url>,
    pub token: Option<String>,
    pub auth_scheme: String,
    pub host: String,
    pub timeout: Duration,
    pub tls: TlsConfig,
}

impl CollectorConfig {
    /// Both endpoint and token are present.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.token.is_some()
    }
}

impl fmt::Debug for CollectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorConfig")
            .field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_scheme", &self.auth_scheme)
            .field("host", &self.host)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// `false` disables certificate and hostname verification entirely.
    pub verify_peer: bool,
    /// Extra trust anchor; system roots stay trusted as well.
    pub ca_cert: Option<PathBuf>,
    pub client_identity: Option<ClientIdentityPaths>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_peer: true,
            ca_cert: None,
            client_identity: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientIdentityPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub wordlist_path: Option<PathBuf>,
    pub fuzzy_threshold: f64,
    pub toxicity_endpoint: Option<Url>,
    pub toxicity_threshold: f64,
    pub timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            wordlist_path: None,
            fuzzy_threshold: 0.94,
            toxicity_endpoint: None,
            toxicity_threshold: 0.7,
            timeout: Duration::from_secs(5),
        }
    }
}
