//! Shared test support utilities
//!
//! Test doubles for the relay's seams: `RecordingSink` for `EventSink`,
//! `CountingScorer`/`FixedScorer` for `ToxicityScorer`, and `FailingCheck`
//! for `ContentCheck`.

use crate::domain::{AckId, LogEvent, RequestChannel};
use crate::forwarder::ForwardOutcome;
use crate::gate::{CheckOutcome, ContentCheck, GateError, GateInput, ToxicityScorer};
use crate::port::EventSink;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sink that records every event and answers with a preset outcome.
pub struct RecordingSink {
    events: Arc<Mutex<Vec<LogEvent>>>,
    outcome: Mutex<Option<ForwardOutcome>>,
}

impl RecordingSink {
    /// Answers `Delivered` with a fresh channel and ack id 0.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            outcome: Mutex::new(None),
        }
    }

    /// Answers every call with `outcome`.
    pub fn with_outcome(outcome: ForwardOutcome) -> Self {
        let sink = Self::new();
        sink.set_outcome(outcome);
        sink
    }

    pub fn set_outcome(&self, outcome: ForwardOutcome) {
        *self.outcome.lock().unwrap() = Some(outcome);
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn forward(&self, event: LogEvent) -> Pin<Box<dyn Future<Output = ForwardOutcome> + Send + '_>> {
        let events = self.events.clone();
        Box::pin(async move {
            events.lock().unwrap().push(event);
            self.outcome
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| ForwardOutcome::Delivered {
                    channel: RequestChannel::generate(),
                    ack_id: AckId::Numeric(0),
                })
        })
    }
}

/// Scorer that returns a fixed score and counts calls.
pub struct CountingScorer {
    score: f64,
    calls: AtomicUsize,
}

impl CountingScorer {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ToxicityScorer for CountingScorer {
    fn score<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, GateError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let score = self.score;
        Box::pin(async move { Ok(score) })
    }
}

/// Scorer that always returns the same score.
pub struct FixedScorer(f64);

impl FixedScorer {
    pub fn new(score: f64) -> Self {
        Self(score)
    }
}

impl ToxicityScorer for FixedScorer {
    fn score<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, GateError>> + Send + 'a>> {
        let score = self.0;
        Box::pin(async move { Ok(score) })
    }
}

#[derive(Clone, Copy)]
enum Failure {
    Error,
    Panic,
}

/// Check named `failing` that errors or panics on every message.
///
/// Clones share one call counter, so a test can keep a handle after boxing
/// a clone into the gate.
#[derive(Clone)]
pub struct FailingCheck {
    failure: Failure,
    calls: Arc<AtomicUsize>,
}

impl FailingCheck {
    pub fn error() -> Self {
        Self {
            failure: Failure::Error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn panic() -> Self {
        Self {
            failure: Failure::Panic,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentCheck for FailingCheck {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn evaluate<'a>(
        &'a self,
        _input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            match self.failure {
                Failure::Error => Err(GateError::Classifier("scoring model offline".to_string())),
                Failure::Panic => panic!("scorer exploded"),
            }
        })
    }
}
