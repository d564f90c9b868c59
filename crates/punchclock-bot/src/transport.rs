//! Chat transport interface

use async_trait::async_trait;
use punchclock_util::ChatId;
use std::time::Duration;
use thiserror::Error;

/// Errors from the chat transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error: {0}")]
    Api(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// An inbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub text: Option<String>,
    /// Send time as reported by the chat service, unix seconds
    pub sent_at: i64,
}

/// One entry from the update stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    /// `None` for update kinds the bot ignores
    pub message: Option<IncomingMessage>,
}

/// Receives updates and sends messages
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch updates with id >= `offset`, waiting up to `timeout` for new ones
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> TransportResult<Vec<Update>>;

    /// Send a text message to a chat
    async fn send_message(&self, chat_id: ChatId, text: &str) -> TransportResult<()>;
}
