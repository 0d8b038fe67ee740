use std::time::Duration;
use thiserror::Error;

/// Port probed when `HTTP_PORT` is unset or unreadable.
const DEFAULT_HTTP_PORT: u16 = 10000;

#[derive(Error, Debug)]
#[error("Healthcheck failed: {0}")]
pub struct HealthcheckError(String);

/// Probe the local relay on `HTTP_PORT` (default 10000).
pub async fn healthcheck() -> Result<(), HealthcheckError> {
    let port = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);
    healthcheck_with_port(port).await
}

/// Probe `GET /health` on a specific local port.
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| HealthcheckError(format!("Failed to create HTTP client: {e}")))?;

    let url = format!("http://127.0.0.1:{port}/health");

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| HealthcheckError(format!("Request failed: {e}")))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(HealthcheckError(format!(
            "Health endpoint returned status: {}",
            resp.status()
        )))
    }
}
