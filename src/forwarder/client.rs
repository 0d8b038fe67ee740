use super::ForwarderError;
use crate::config::TlsConfig;
use reqwest::{Certificate, Client, ClientBuilder, Identity};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("rask-hec-relay/", env!("CARGO_PKG_VERSION"));

/// Build the collector HTTP client.
///
/// TLS material is read from disk here, once; the resulting client is
/// immutable and shared by every forward call.
pub fn build_http_client(tls: &TlsConfig, timeout: Duration) -> Result<Client, ForwarderError> {
    let mut builder = ClientBuilder::new()
        .use_rustls_tls()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT);

    if !tls.verify_peer {
        warn!("TLS peer verification is disabled for the log collector");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &tls.ca_cert {
        let pem = read_material(path)?;
        let certs = Certificate::from_pem_bundle(&pem).map_err(|e| ForwarderError::InvalidTls {
            path: path.clone(),
            source: e,
        })?;
        if certs.is_empty() {
            return Err(ForwarderError::EmptyBundle { path: path.clone() });
        }
        debug!("Trusting {} certificate(s) from {}", certs.len(), path.display());
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    if let Some(identity) = &tls.client_identity {
        let mut pem = read_material(&identity.cert)?;
        pem.push(b'\n');
        pem.extend(read_material(&identity.key)?);
        let identity_pem = Identity::from_pem(&pem).map_err(|e| ForwarderError::InvalidTls {
            path: identity.cert.clone(),
            source: e,
        })?;
        debug!("Presenting client certificate {}", identity.cert.display());
        builder = builder.identity(identity_pem);
    }

    builder.build().map_err(ForwarderError::Client)
}

fn read_material(path: &Path) -> Result<Vec<u8>, ForwarderError> {
    std::fs::read(path).map_err(|e| ForwarderError::TlsMaterial {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientIdentityPaths;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data/tls")
            .join(name)
    }

    #[test]
    fn test_default_tls_builds() {
        assert!(build_http_client(&TlsConfig::default(), Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_insecure_mode_builds() {
        let tls = TlsConfig {
            verify_peer: false,
            ..TlsConfig::default()
        };
        assert!(build_http_client(&tls, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_missing_ca_file_fails() {
        let tls = TlsConfig {
            ca_cert: Some(PathBuf::from("/nonexistent/relay/ca.pem")),
            ..TlsConfig::default()
        };
        let err = build_http_client(&tls, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ForwarderError::TlsMaterial { .. }));
        assert!(err.to_string().contains("/nonexistent/relay/ca.pem"));
    }

    #[test]
    fn test_garbage_ca_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, "this is not a certificate").unwrap();
        let tls = TlsConfig {
            ca_cert: Some(path),
            ..TlsConfig::default()
        };
        assert!(build_http_client(&tls, Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_garbage_client_identity_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let cert = dir.path().join("client.pem");
        let key = dir.path().join("client.key");
        std::fs::write(&cert, "not a cert").unwrap();
        std::fs::write(&key, "not a key").unwrap();
        let tls = TlsConfig {
            client_identity: Some(ClientIdentityPaths { cert, key }),
            ..TlsConfig::default()
        };
        assert!(build_http_client(&tls, Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_ca_bundle_builds() {
        let tls = TlsConfig {
            ca_cert: Some(fixture("ca.pem")),
            ..TlsConfig::default()
        };
        assert!(build_http_client(&tls, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_client_identity_builds() {
        let tls = TlsConfig {
            ca_cert: Some(fixture("ca.pem")),
            client_identity: Some(ClientIdentityPaths {
                cert: fixture("client.pem"),
                key: fixture("client.key"),
            }),
            ..TlsConfig::default()
        };
        let result = build_http_client(&tls, Duration::from_secs(5));
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn test_missing_client_key_fails() {
        let tls = TlsConfig {
            client_identity: Some(ClientIdentityPaths {
                cert: fixture("client.pem"),
                key: fixture("missing.key"),
            }),
            ..TlsConfig::default()
        };
        let err = build_http_client(&tls, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ForwarderError::TlsMaterial { .. }));
    }
}
