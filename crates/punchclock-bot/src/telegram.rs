//! Bot API client (long polling)

use async_trait::async_trait;
use punchclock_util::ChatId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::{ChatTransport, IncomingMessage, TransportError, TransportResult, Update};

/// Extra time granted to the HTTP request on top of the long-poll timeout
const REQUEST_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUpdate {
    update_id: i64,
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    date: i64,
    chat: WireChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

impl From<WireUpdate> for Update {
    fn from(wire: WireUpdate) -> Self {
        Update {
            update_id: wire.update_id,
            message: wire.message.map(|m| IncomingMessage {
                chat_id: ChatId::new(m.chat.id),
                text: m.text,
                sent_at: m.date,
            }),
        }
    }
}

/// Bot API client
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> TransportResult<T> {
        let response: ApiResponse<T> = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .timeout(timeout)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        match (response.ok, response.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api(
                response
                    .description
                    .unwrap_or_else(|| format!("{} failed", method)),
            )),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> TransportResult<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });

        let updates: Vec<WireUpdate> = self
            .call("getUpdates", body, timeout + REQUEST_GRACE)
            .await?;

        debug!(count = updates.len(), "Updates received");
        Ok(updates.into_iter().map(Update::from).collect())
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> TransportResult<()> {
        let body = json!({
            "chat_id": chat_id.as_i64(),
            "text": text,
        });

        let _: serde_json::Value = self.call("sendMessage", body, REQUEST_GRACE).await?;
        debug!(chat_id = %chat_id, "Message sent");
        Ok(())
    }
}
