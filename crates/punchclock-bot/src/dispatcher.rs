//! Command dispatcher
//!
//! Maps authorized chat commands onto the session tracker and the reminder
//! scheduler, and turns the results into reply text.

use chrono::{DateTime, FixedOffset};
use punchclock_core::{ReminderScheduler, SessionTracker, TrackerError};
use punchclock_util::{from_unix_seconds, ChatId, UtilError, WorkZone};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{replies, ChatTransport, Command, FailureNotifier, IncomingMessage};

/// Failures the service loop must report
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("Invalid message timestamp: {0}")]
    Timestamp(#[from] UtilError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Routes commands from the single authorized chat
pub struct Dispatcher {
    tracker: Arc<SessionTracker>,
    scheduler: Arc<ReminderScheduler>,
    transport: Arc<dyn ChatTransport>,
    authorized: ChatId,
    zone: WorkZone,
}

impl Dispatcher {
    pub fn new(
        tracker: Arc<SessionTracker>,
        scheduler: Arc<ReminderScheduler>,
        transport: Arc<dyn ChatTransport>,
        authorized: ChatId,
        zone: WorkZone,
    ) -> Self {
        Self {
            tracker,
            scheduler,
            transport,
            authorized,
            zone,
        }
    }

    pub fn is_authorized(&self, chat_id: ChatId) -> bool {
        chat_id == self.authorized
    }

    /// Handle one message and return the reply to send, if any.
    ///
    /// Messages from other chats and plain text get no reply.
    pub fn handle(&self, message: &IncomingMessage) -> DispatchResult<Option<String>> {
        if !self.is_authorized(message.chat_id) {
            debug!(chat_id = %message.chat_id, "Ignoring message from unauthorized chat");
            return Ok(None);
        }

        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return Ok(None);
        };

        let now = from_unix_seconds(message.sent_at, &self.zone)?;
        debug!(chat_id = %message.chat_id, command = ?command, at = %now, "Dispatching command");

        let reply = match command {
            Command::ClockIn => self.clock_in(message.chat_id, now)?,
            Command::ClockOut => self.clock_out(message.chat_id, now)?,
            Command::TimeBudget => replies::time_budget(self.tracker.time_budget_hours()?),
            Command::Status => self.status(message.chat_id, now)?,
            Command::Help => replies::HELP.to_string(),
            Command::Unknown(name) => replies::unknown_command(&name),
        };

        Ok(Some(reply))
    }

    /// Handle one message and deliver the reply.
    ///
    /// Failures are logged, reported to `notifier` and answered with a
    /// generic error text; nothing is retried.
    pub async fn respond(&self, message: &IncomingMessage, notifier: &FailureNotifier) {
        let reply = match self.handle(message) {
            Ok(Some(reply)) => reply,
            Ok(None) => return,
            Err(e) => {
                error!(chat_id = %message.chat_id, error = %e, "Failed to handle update");
                notifier
                    .notify(&format!("An error occurred: {}", e))
                    .await;
                replies::INTERNAL_ERROR.to_string()
            }
        };

        if let Err(e) = self.transport.send_message(message.chat_id, &reply).await {
            warn!(chat_id = %message.chat_id, error = %e, "Failed to send reply");
        }
    }

    fn clock_in(&self, chat_id: ChatId, now: DateTime<FixedOffset>) -> DispatchResult<String> {
        // Planned first so a failing budget read leaves no session behind
        let plan = self.tracker.plan_reminder(now)?;

        let session = match self.tracker.clock_in(now) {
            Ok(session) => session,
            Err(TrackerError::SessionAlreadyOpen(open)) => {
                return Ok(replies::already_clocked_in(&open));
            }
            Err(e) => return Err(e.into()),
        };

        let transport = Arc::clone(&self.transport);
        self.scheduler.arm(
            chat_id,
            plan.due_offset_seconds,
            plan.due_at,
            move || async move {
                if let Err(e) = transport.send_message(chat_id, replies::GO_HOME).await {
                    warn!(chat_id = %chat_id, error = %e, "Failed to deliver reminder");
                }
            },
        );

        Ok(replies::clocked_in(&session, &plan))
    }

    fn clock_out(&self, chat_id: ChatId, now: DateTime<FixedOffset>) -> DispatchResult<String> {
        let result = self.tracker.clock_out(now);

        // A stray reminder is dropped even when nothing was open
        let cancelled = self.scheduler.cancel(chat_id);
        debug!(chat_id = %chat_id, cancelled, "Reminder cleared on clock-out");

        let out = match result {
            Ok(out) => out,
            Err(TrackerError::NoOpenSession) => return Ok(replies::NO_OPEN_SESSION.to_string()),
            Err(e) => return Err(e.into()),
        };

        let budget = self.tracker.time_budget_hours()?;
        info!(
            session_id = %out.session.id,
            worked_hours = out.worked_hours(),
            budget_hours = budget,
            "Session closed"
        );

        Ok(replies::clocked_out(&out, budget))
    }

    fn status(&self, chat_id: ChatId, now: DateTime<FixedOffset>) -> DispatchResult<String> {
        let open = self.tracker.open_session()?;
        Ok(replies::status(
            open.as_ref(),
            self.scheduler.pending(chat_id),
            now,
        ))
    }
}
