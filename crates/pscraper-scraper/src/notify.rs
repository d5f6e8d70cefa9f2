//! Notification sink for page-level scrape failures.
//!
//! Delivery is fire-and-forget: a failure to notify is logged and otherwise
//! ignored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Posts messages to a Slack incoming webhook as `{"text": message}`.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` if the HTTP client cannot be
    /// constructed.
    pub fn new(webhook_url: impl Into<String>, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &str) {
        let payload = serde_json::json!({ "text": message });
        let result = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to deliver Slack notification");
        }
    }
}

/// Writes notifications to the log at `error` level. Used when no webhook is
/// configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        tracing::error!(message, "scrape notification");
    }
}
