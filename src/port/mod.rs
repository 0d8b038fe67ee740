use crate::domain::LogEvent;
use crate::forwarder::ForwardOutcome;
use std::future::Future;
use std::pin::Pin;

/// Destination for accepted events.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
/// `EventForwarder` is the production implementation; tests use
/// `test_support::RecordingSink`.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Never fails: every problem is reported through the
    /// returned outcome.
    fn forward(&self, event: LogEvent) -> Pin<Box<dyn Future<Output = ForwardOutcome> + Send + '_>>;
}
