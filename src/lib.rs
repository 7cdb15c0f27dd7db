//! Best-effort incident reporting to a chat webhook.
//!
//! This crate posts application errors to a Google Chat style webhook so a
//! human operator sees them in a chat thread. Reporting is fire-and-forget:
//! every failure, from a broken custom serializer to an unreachable webhook,
//! is contained and logged, and never reaches the calling process.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use incident_notify::{ErrorReport, IncidentNotifier, TracingLogger};
//!
//! # async fn demo() -> Result<(), incident_notify::ConfigError> {
//! let notifier = IncidentNotifier::new(
//!     "https://chat.googleapis.com/v1/spaces/X/messages?key=k&token=t",
//!     Arc::new(TracingLogger),
//! )?
//! .with_default_thread("production");
//!
//! let error = std::io::Error::other("database unreachable");
//! notifier.report(&ErrorReport(error)).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`Reportable`] is the capability an error value implements to be
//!   reported; [`ErrorReport`] adapts any [`std::error::Error`]
//! - [`IncidentLogger`] is the injected logging capability; [`TracingLogger`]
//!   forwards it to the `tracing` subscriber
//! - [`IncidentNotifier`] builds the message and delegates to a private
//!   webhook send step
//!
//! There is no retry, batching, or delivery guarantee. A send is one HTTP
//! round trip with no timeout; a hung webhook hangs that report.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logger;
pub mod report;

mod chat;

pub use error::ConfigError;
pub use logger::{IncidentLogger, TracingLogger};
pub use report::{ErrorReport, PropsError, Reportable};

use std::sync::Arc;

use serde_json::json;

use chat::{ChatMessage, ChatSender, STACK_TAG};

/// Substitute message when an incident has no descriptive trace.
const UNKNOWN_TRACE: &str = "UNKNOWN";

/// Posts incidents to a chat webhook.
///
/// Immutable after construction; concurrent [`report`](Self::report) calls
/// on one instance are independent.
pub struct IncidentNotifier {
    sender: ChatSender,
    logger: Arc<dyn IncidentLogger>,
}

impl IncidentNotifier {
    /// Create a notifier for the given webhook URL.
    ///
    /// The URL must already carry its query parameters (key, token); the
    /// thread key is appended to it on every send.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingWebhook`] when the URL is empty.
    pub fn new(
        webhook_url: impl Into<String>,
        logger: Arc<dyn IncidentLogger>,
    ) -> Result<Self, ConfigError> {
        let webhook_url = webhook_url.into();
        if webhook_url.is_empty() {
            return Err(ConfigError::MissingWebhook);
        }

        Ok(Self {
            sender: ChatSender::new(webhook_url, Arc::clone(&logger)),
            logger,
        })
    }

    /// Set the thread key used to group messages in the chat backend.
    ///
    /// Typically the deployment environment name. Defaults to `"SVILUPPO"`.
    #[must_use]
    pub fn with_default_thread(mut self, thread: impl Into<String>) -> Self {
        self.sender.set_default_thread(thread.into());
        self
    }

    /// Report an incident to the chat webhook.
    ///
    /// Best-effort: this never panics and never returns an error. A failing
    /// custom serializer is logged once and the notification is dropped; a
    /// transport failure is logged and the call resolves normally. The
    /// returned boolean is `true` only for a confirmed send, for callers who
    /// care about delivery.
    pub async fn report(&self, incident: &dyn Reportable) -> bool {
        let message = match Self::build_message(incident) {
            Ok(message) => message,
            Err(_) => {
                self.logger.error(json!({
                    "msg": "Cannot send incident report, unexpected exception"
                }));
                return false;
            }
        };

        self.sender.send(message).await
    }

    fn build_message(incident: &dyn Reportable) -> Result<ChatMessage, PropsError> {
        let msg = incident
            .trace()
            .unwrap_or_else(|| UNKNOWN_TRACE.to_string());
        let props = incident.chat_props()?;

        Ok(ChatMessage {
            msg,
            tag: STACK_TAG,
            props,
            msg_id: None,
            thread: None,
        })
    }
}
