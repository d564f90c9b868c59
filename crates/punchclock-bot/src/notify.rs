//! Failure webhook
//!
//! Posts `{"msg": "..."}` to a push URL (Uptime Kuma style) when handling
//! an update fails. Delivery problems are logged and otherwise ignored.

use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound failure notifications
pub struct FailureNotifier {
    http: reqwest::Client,
    url: Option<String>,
}

impl FailureNotifier {
    pub fn new(url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Notifier that only logs
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Report a failure. Returns whether the webhook accepted it.
    pub async fn notify(&self, message: &str) -> bool {
        let Some(url) = &self.url else {
            return false;
        };

        let result = self
            .http
            .post(url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&json!({ "msg": message }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Failure reported to webhook");
                true
            }
            Ok(response) => {
                error!(status = %response.status(), "Failure webhook rejected the report");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to reach failure webhook");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_notifier_does_nothing() {
        let notifier = FailureNotifier::disabled();
        assert!(!notifier.is_enabled());
        assert!(!notifier.notify("boom").await);
    }
}
