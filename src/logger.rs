//! Logger capability injected into the notifier.

use serde_json::Value;
use tracing::{debug, error, info};

/// Structured logging capability required by [`IncidentNotifier`].
///
/// Each operation receives an arbitrary structured context value and
/// returns nothing. Implement this on a test double to assert on the
/// notifier's logging contract, or use [`TracingLogger`] to forward
/// everything to the `tracing` subscriber.
///
/// [`IncidentNotifier`]: crate::IncidentNotifier
pub trait IncidentLogger: Send + Sync {
    /// Record an error-level context.
    fn error(&self, context: Value);

    /// Record an info-level context.
    fn log(&self, context: Value);

    /// Record a debug-level context.
    fn debug(&self, context: Value);
}

/// [`IncidentLogger`] backend that forwards to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl IncidentLogger for TracingLogger {
    fn error(&self, context: Value) {
        error!(%context, "incident notifier");
    }

    fn log(&self, context: Value) {
        info!(%context, "incident notifier");
    }

    fn debug(&self, context: Value) {
        debug!(%context, "incident notifier");
    }
}
