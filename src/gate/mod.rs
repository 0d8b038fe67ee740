//! Layered content gate in front of the forwarding path.
//!
//! Checks run in order, cheapest first. The first rejection wins and stops
//! evaluation; scores are never aggregated across checks.

mod fuzzy;
mod lexicon;
mod normalize;
mod obfuscation;
mod toxicity;

use crate::config::GateConfig;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub use fuzzy::FuzzyCheck;
pub use lexicon::{LexiconCheck, Wordlist};
pub use normalize::Normalizer;
pub use obfuscation::ObfuscationCheck;
pub use toxicity::{HttpToxicityScorer, ToxicityCheck, ToxicityScorer};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Check panicked: {0}")]
    Panicked(String),

    #[error("Failed to read wordlist {}: {source}", path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid gate pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// The message as each check sees it.
#[derive(Debug, Clone)]
pub struct GateInput {
    pub raw: String,
    /// Lowercased, links removed, punctuation kept.
    pub unlinked: String,
    pub normalized: String,
}

impl GateInput {
    pub fn new(raw: &str, normalizer: &Normalizer) -> Self {
        Self {
            raw: raw.to_string(),
            unlinked: normalizer.strip_links(raw),
            normalized: normalizer.normalize(raw),
        }
    }
}

/// What a single check decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Pass,
    Reject(String),
}

impl CheckOutcome {
    pub fn is_reject(&self) -> bool {
        matches!(self, CheckOutcome::Reject(_))
    }
}

/// One layer of the gate.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait ContentCheck: Send + Sync {
    /// Stable layer name used in verdicts and logs.
    fn name(&self) -> &'static str;

    fn evaluate<'a>(
        &'a self,
        input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Approved,
    Blocked { layer: &'static str, reason: String },
    /// A check errored or panicked. Never treated as approval.
    CheckFailed { layer: &'static str, detail: String },
}

impl GateVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateVerdict::Blocked { .. })
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, GateVerdict::Approved)
    }
}

pub struct ContentGate {
    normalizer: Normalizer,
    checks: Vec<Box<dyn ContentCheck>>,
}

impl ContentGate {
    pub fn new(checks: Vec<Box<dyn ContentCheck>>) -> Result<Self, GateError> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            checks,
        })
    }

    /// Built-in wordlist (plus `wordlist_path`), the three word checks, and
    /// the toxicity check when a scoring endpoint is configured.
    pub fn from_config(config: &GateConfig) -> Result<Self, GateError> {
        let mut wordlist = Wordlist::builtin();
        if let Some(path) = &config.wordlist_path {
            let added = wordlist.extend_from_file(path)?;
            info!("Loaded {} extra wordlist entries from {}", added, path.display());
        }

        let mut checks = word_checks(Arc::new(wordlist), config.fuzzy_threshold)?;

        match &config.toxicity_endpoint {
            Some(endpoint) => {
                let scorer = HttpToxicityScorer::new(endpoint.clone(), config.timeout)?;
                info!(
                    endpoint = %scorer.endpoint(),
                    threshold = config.toxicity_threshold,
                    "Toxicity check enabled"
                );
                checks.push(Box::new(ToxicityCheck::new(
                    Arc::new(scorer),
                    config.toxicity_threshold,
                )));
            }
            None => info!("No toxicity endpoint configured; toxicity check disabled"),
        }

        Self::new(checks)
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub async fn evaluate(&self, message: &str) -> GateVerdict {
        let input = GateInput::new(message, &self.normalizer);

        for check in &self.checks {
            let layer = check.name();
            let result = AssertUnwindSafe(async { check.evaluate(&input).await })
                .catch_unwind()
                .await;

            match result {
                Ok(Ok(CheckOutcome::Pass)) => {
                    debug!(layer, "Check passed");
                }
                Ok(Ok(CheckOutcome::Reject(reason))) => {
                    return GateVerdict::Blocked { layer, reason };
                }
                Ok(Err(e)) => {
                    return GateVerdict::CheckFailed {
                        layer,
                        detail: e.to_string(),
                    };
                }
                Err(panic) => {
                    return GateVerdict::CheckFailed {
                        layer,
                        detail: GateError::Panicked(panic_message(panic.as_ref())).to_string(),
                    };
                }
            }
        }

        GateVerdict::Approved
    }
}

/// Obfuscation, lexicon and fuzzy checks over one shared wordlist, in that
/// order.
pub fn word_checks(
    wordlist: Arc<Wordlist>,
    fuzzy_threshold: f64,
) -> Result<Vec<Box<dyn ContentCheck>>, GateError> {
    let checks: Vec<Box<dyn ContentCheck>> = vec![
        Box::new(ObfuscationCheck::new(&wordlist)?),
        Box::new(LexiconCheck::new(wordlist.clone())),
        Box::new(FuzzyCheck::new(wordlist, fuzzy_threshold)),
    ];
    Ok(checks)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
