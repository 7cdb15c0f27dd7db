//! Chat webhook send step.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::logger::IncidentLogger;

/// Thread key used when none was configured.
pub(crate) const DEFAULT_THREAD: &str = "SVILUPPO";

/// Tag attached to every incident message.
pub(crate) const STACK_TAG: &str = "stack";

/// One chat message, alive only for the duration of a send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatMessage {
    pub msg: String,
    pub tag: &'static str,
    pub props: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
}

/// Performs the webhook POST for [`IncidentNotifier`].
///
/// Single attempt, no timeout. Failure is surfaced to the caller as `false`
/// and through the injected logger, never as an error.
///
/// [`IncidentNotifier`]: crate::IncidentNotifier
pub(crate) struct ChatSender {
    client: reqwest::Client,
    webhook_url: String,
    default_thread: String,
    logger: Arc<dyn IncidentLogger>,
}

impl ChatSender {
    pub(crate) fn new(webhook_url: String, logger: Arc<dyn IncidentLogger>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
            default_thread: DEFAULT_THREAD.to_string(),
            logger,
        }
    }

    pub(crate) fn set_default_thread(&mut self, thread: String) {
        self.default_thread = thread;
    }

    /// Send one message to the webhook, logging the outcome.
    ///
    /// Returns `true` when the POST went out and the reply parsed as JSON.
    /// The HTTP status is not inspected; the webhook reply is only echoed
    /// into the debug log.
    pub(crate) async fn send(&self, message: ChatMessage) -> bool {
        let thread = message
            .thread
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.default_thread)
            .to_string();
        // The webhook URL already carries its key/token query parameters.
        let url = format!("{}&threadKey={thread}", self.webhook_url);

        let msg_id = message
            .msg_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let text = format_text(
            &thread,
            &msg_id,
            Utc::now(),
            message.props.as_deref(),
            message.tag,
            &message.msg,
        );
        let body = json!({ "text": text }).to_string();

        debug!(%url, %msg_id, "sending incident message");

        match self.post(&url, body.clone()).await {
            Ok(response) => {
                self.logger.log(json!({ "msg": "Sent msg OK", "msgId": msg_id }));
                self.logger.debug(json!({ "response": response, "data": message }));
                true
            }
            Err(err) => {
                self.logger
                    .error(json!({ "msg": "Cannot send msg to google chat", "body": body }));
                self.logger.error(json!(err.to_string()));
                false
            }
        }
    }

    async fn post(&self, url: &str, body: String) -> Result<Value, reqwest::Error> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body)
            .send()
            .await?;

        response.json().await
    }
}

/// Format the message body text.
///
/// The timestamp is rendered with millisecond precision and a `Z` suffix,
/// byte-compatible with JavaScript's `Date#toISOString`.
fn format_text(
    thread: &str,
    msg_id: &str,
    at: DateTime<Utc>,
    props: Option<&str>,
    tag: &str,
    msg: &str,
) -> String {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut text = format!("[{thread}#{msg_id}] @ {stamp}\n\n");
    if let Some(props) = props {
        text.push_str("PROPS 📋 ");
        text.push_str(props);
        text.push('\n');
    }
    text.push_str(&tag.to_uppercase());
    text.push_str(" 📋 ");
    text.push_str(msg);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::TracingLogger;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678)
    }

    #[test]
    fn test_text_without_props() {
        let text = format_text(
            "test_thread",
            "id-1",
            fixed_instant(),
            None,
            STACK_TAG,
            "Error: testError",
        );
        assert_eq!(
            text,
            "[test_thread#id-1] @ 2024-01-02T03:04:05.678Z\n\nSTACK 📋 Error: testError"
        );
    }

    #[test]
    fn test_text_with_props() {
        let text = format_text(
            "test_thread",
            "id-1",
            fixed_instant(),
            Some("X"),
            STACK_TAG,
            "M",
        );
        assert_eq!(
            text,
            "[test_thread#id-1] @ 2024-01-02T03:04:05.678Z\n\nPROPS 📋 X\nSTACK 📋 M"
        );
    }

    #[test]
    fn test_tag_is_uppercased() {
        let text = format_text("t", "i", fixed_instant(), None, "stack", "m");
        assert!(text.ends_with("STACK 📋 m"));
    }

    #[tokio::test]
    async fn test_explicit_thread_and_id_win_over_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(query_param("threadKey", "alerts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sender = ChatSender::new(
            format!("{}/hook?key=k", server.uri()),
            Arc::new(TracingLogger),
        );
        let delivered = sender
            .send(ChatMessage {
                msg: "m".to_string(),
                tag: STACK_TAG,
                props: None,
                msg_id: Some("fixed-id".to_string()),
                thread: Some("alerts".to_string()),
            })
            .await;
        assert!(delivered);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["text"].as_str().unwrap().starts_with("[alerts#fixed-id] @ "));
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let message = ChatMessage {
            msg: "m".to_string(),
            tag: STACK_TAG,
            props: None,
            msg_id: Some("id-1".to_string()),
            thread: None,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["tag"], "stack");
        assert_eq!(value["msgId"], "id-1");
        assert!(value["props"].is_null());
        assert!(value.get("thread").is_none());
    }
}
