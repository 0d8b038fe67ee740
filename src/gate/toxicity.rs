use super::{CheckOutcome, ContentCheck, GateError, GateInput};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A model that scores text for toxicity in `[0, 1]`.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait ToxicityScorer: Send + Sync {
    fn score<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, GateError>> + Send + 'a>>;
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
    toxicity: f64,
}

/// Scores through a Detoxify-style HTTP service: `POST {"text": ...}`,
/// answer `{"toxicity": <f64>}`.
pub struct HttpToxicityScorer {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpToxicityScorer {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, GateError> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GateError::Classifier(format!("Failed to build scorer client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request_score(&self, text: &str) -> Result<f64, GateError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&ScoreRequest { text })
            .send()
            .await
            .map_err(|e| GateError::Classifier(format!("Scoring request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Classifier(format!(
                "Scoring service returned {status}: {body}"
            )));
        }

        let parsed: ScoreResponse = response
            .json()
            .await
            .map_err(|e| GateError::Classifier(format!("Unreadable scoring response: {e}")))?;

        if !parsed.toxicity.is_finite() {
            return Err(GateError::Classifier(format!(
                "Scoring service returned non-finite score {}",
                parsed.toxicity
            )));
        }
        Ok(parsed.toxicity)
    }
}

impl ToxicityScorer for HttpToxicityScorer {
    fn score<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, GateError>> + Send + 'a>> {
        Box::pin(self.request_score(text))
    }
}

/// Rejects when the scorer rates the raw message above `threshold`.
pub struct ToxicityCheck {
    scorer: Arc<dyn ToxicityScorer>,
    threshold: f64,
}

impl ToxicityCheck {
    pub fn new(scorer: Arc<dyn ToxicityScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }
}

impl ContentCheck for ToxicityCheck {
    fn name(&self) -> &'static str {
        "toxicity"
    }

    fn evaluate<'a>(
        &'a self,
        input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>> {
        Box::pin(async move {
            let score = self.scorer.score(&input.raw).await?;
            debug!(score, threshold = self.threshold, "Toxicity score");
            if score > self.threshold {
                Ok(CheckOutcome::Reject(format!(
                    "toxicity {score:.2} above {:.2}",
                    self.threshold
                )))
            } else {
                Ok(CheckOutcome::Pass)
            }
        })
    }
}
