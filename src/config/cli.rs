use super::env::{load_secret_file, non_blank};
use super::groups::{ClientIdentityPaths, CollectorConfig, GateConfig, TlsConfig};
use super::{ConfigError, LogFormat, LogLevel};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Fallback `host` value when neither `HEC_HOST` nor the machine hostname is usable.
const FALLBACK_HOST: &str = "rask-hec-relay";

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Splunk HEC event endpoint, e.g. https://splunk:8088/services/collector/event
    #[arg(long, env = "SPLUNK_HEC_URL")]
    pub hec_url: Option<String>,

    /// HEC token (SPLUNK_HEC_TOKEN_FILE is honored when this is unset)
    #[arg(long, env = "SPLUNK_HEC_TOKEN", hide_env_values = true)]
    pub hec_token: Option<String>,

    /// Authorization scheme placed before the token
    #[arg(long, env = "HEC_AUTH_SCHEME", default_value = "Splunk")]
    pub auth_scheme: String,

    /// `host` field of every event (defaults to the machine hostname)
    #[arg(long, env = "HEC_HOST")]
    pub hec_host: Option<String>,

    /// Source label used when a client does not send one
    #[arg(long, env = "DEFAULT_SOURCE", default_value = "client")]
    pub default_source: String,

    /// Verify the collector's TLS certificate
    #[arg(long, env = "HEC_TLS_VERIFY", default_value_t = true, action = ArgAction::Set)]
    pub tls_verify: bool,

    /// PEM bundle trusted as the collector's certificate authority
    #[arg(long, env = "HEC_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// PEM client certificate presented to the collector
    #[arg(long, env = "HEC_CLIENT_CERT")]
    pub client_cert: Option<PathBuf>,

    /// PEM private key matching the client certificate
    #[arg(long, env = "HEC_CLIENT_KEY")]
    pub client_key: Option<PathBuf>,

    /// Timeout for each outbound request in seconds
    #[arg(long, env = "HEC_TIMEOUT_SECS", default_value = "5")]
    pub request_timeout_secs: u64,

    /// Port the relay listens on
    #[arg(long, env = "HTTP_PORT", default_value = "10000")]
    pub http_port: u16,

    /// Toxicity scoring service; the toxicity check is skipped when unset
    #[arg(long, env = "TOXICITY_ENDPOINT")]
    pub toxicity_endpoint: Option<String>,

    /// Messages scoring above this are rejected
    #[arg(long, env = "TOXICITY_THRESHOLD", default_value = "0.7")]
    pub toxicity_threshold: f64,

    /// Similarity at or above which a token counts as a wordlist match
    #[arg(long, env = "FUZZY_THRESHOLD", default_value = "0.94")]
    pub fuzzy_threshold: f64,

    /// Extra wordlist entries, one per line
    #[arg(long, env = "WORDLIST_PATH")]
    pub wordlist_path: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format (json or pretty)
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// Configuration file path (optional, TOML)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hec_url: None,
            hec_token: None,
            auth_scheme: "Splunk".to_string(),
            hec_host: None,
            default_source: "client".to_string(),
            tls_verify: true,
            ca_cert: None,
            client_cert: None,
            client_key: None,
            request_timeout_secs: 5,
            http_port: 10000,
            toxicity_endpoint: None,
            toxicity_threshold: 0.7,
            fuzzy_threshold: 0.94,
            wordlist_path: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
            config_file: None,
        }
    }
}

impl Config {
    /// Load from process arguments and environment, switching to the TOML
    /// file when `--config-file` / `CONFIG_FILE` is given.
    pub fn load() -> Result<Self, ConfigError> {
        let parsed = Config::parse();
        match parsed.config_file.clone() {
            Some(path) => Self::from_file(path),
            None => parsed.finish(),
        }
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::try_parse_from(args)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?
            .finish()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_file = Some(path.as_ref().to_path_buf());
        config.finish()
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.post_process()?;
        self.validate()?;
        Ok(self)
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.hec_url = non_blank(self.hec_url.take());
        self.hec_token = non_blank(self.hec_token.take());
        self.hec_host = non_blank(self.hec_host.take());
        self.toxicity_endpoint = non_blank(self.toxicity_endpoint.take());

        if self.hec_token.is_none() {
            self.hec_token = load_secret_file("SPLUNK_HEC_TOKEN")?;
        }
        Ok(())
    }

    /// `HEC_HOST`, else the machine hostname, else a fixed fallback.
    pub fn resolved_host(&self) -> String {
        if let Some(host) = &self.hec_host {
            return host.clone();
        }
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| FALLBACK_HOST.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn collector(&self) -> Result<CollectorConfig, ConfigError> {
        let endpoint = self
            .hec_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| ConfigError::InvalidUrl(format!("Invalid HEC URL '{raw}': {e}")))
            })
            .transpose()?;

        let client_identity = match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => Some(ClientIdentityPaths {
                cert: cert.clone(),
                key: key.clone(),
            }),
            _ => None,
        };

        Ok(CollectorConfig {
            endpoint,
            token: self.hec_token.clone(),
            auth_scheme: self.auth_scheme.clone(),
            host: self.resolved_host(),
            timeout: self.request_timeout(),
            tls: TlsConfig {
                verify_peer: self.tls_verify,
                ca_cert: self.ca_cert.clone(),
                client_identity,
            },
        })
    }

    pub fn gate(&self) -> Result<GateConfig, ConfigError> {
        let toxicity_endpoint = self
            .toxicity_endpoint
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| {
                    ConfigError::InvalidUrl(format!("Invalid toxicity endpoint '{raw}': {e}"))
                })
            })
            .transpose()?;

        Ok(GateConfig {
            wordlist_path: self.wordlist_path.clone(),
            fuzzy_threshold: self.fuzzy_threshold,
            toxicity_endpoint,
            toxicity_threshold: self.toxicity_threshold,
            timeout: self.request_timeout(),
        })
    }
}
