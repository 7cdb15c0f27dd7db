//! Error types for the incident notifier.

use thiserror::Error;

/// Errors that can occur when constructing a notifier.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Webhook URL was empty
    #[error("chat webhook URL not provided")]
    MissingWebhook,
}
