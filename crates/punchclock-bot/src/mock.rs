//! Mock chat transport for testing

use async_trait::async_trait;
use punchclock_util::ChatId;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::{ChatTransport, IncomingMessage, TransportError, TransportResult, Update};

/// In-process transport: queue inbound text, inspect what was sent
#[derive(Default)]
pub struct MockTransport {
    inbox: Mutex<VecDeque<Update>>,
    sent: Mutex<Vec<(ChatId, String)>>,
    next_update_id: AtomicI64,
    delivered: Notify,

    /// Configure send to fail
    pub fail_send: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a text message from `chat_id` sent at `sent_at` (unix seconds)
    pub fn push_text(&self, chat_id: ChatId, text: &str, sent_at: i64) -> Update {
        let update = Update {
            update_id: self.next_update_id.fetch_add(1, Ordering::SeqCst) + 1,
            message: Some(IncomingMessage {
                chat_id,
                text: Some(text.to_string()),
                sent_at,
            }),
        };
        self.inbox.lock().unwrap().push_back(update.clone());
        update
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` messages were sent
    pub async fn wait_for_sent(&self, count: usize) -> Vec<(ChatId, String)> {
        loop {
            let notified = self.delivered.notified();
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> TransportResult<Vec<Update>> {
        let ready: Vec<Update> = {
            let mut inbox = self.inbox.lock().unwrap();
            inbox.retain(|u| offset.is_none_or(|o| u.update_id >= o));
            inbox.drain(..).collect()
        };

        if ready.is_empty() {
            tokio::time::sleep(timeout).await;
        }
        Ok(ready)
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> TransportResult<()> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(TransportError::Api("mock send failure".into()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        self.delivered.notify_waiters();
        Ok(())
    }
}
