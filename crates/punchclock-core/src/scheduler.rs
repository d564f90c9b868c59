//! One-shot reminder scheduling, one pending reminder per chat
//!
//! Each armed reminder is a Tokio task sleeping until its due time. The
//! slot map is the single source of truth: a timer only fires if its slot
//! still holds the generation it was armed with, so a cancelled or
//! replaced timer never fires even when its sleep already elapsed.

use chrono::{DateTime, FixedOffset};
use punchclock_util::ChatId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle describing an armed reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderHandle {
    pub identity: ChatId,
    pub generation: u64,
    pub due_at: DateTime<FixedOffset>,
    /// Delay actually used, after clamping
    pub delay: Duration,
}

#[derive(Debug)]
struct PendingReminder {
    generation: u64,
    due_at: DateTime<FixedOffset>,
    task: JoinHandle<()>,
}

type Slots = HashMap<ChatId, PendingReminder>;

fn lock_slots(slots: &Mutex<Slots>) -> MutexGuard<'_, Slots> {
    // Slot bookkeeping stays consistent even if a holder panicked
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Negative, NaN and infinite delays mean "fire now".
fn clamp_delay(delay_seconds: f64) -> Duration {
    if delay_seconds.is_finite() && delay_seconds > 0.0 {
        Duration::try_from_secs_f64(delay_seconds).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

/// Delayed notification scheduler with at most one pending reminder per chat
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    slots: Arc<Mutex<Slots>>,
    next_generation: AtomicU64,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a reminder for `identity`, replacing any pending one.
    ///
    /// `on_fire` runs once, in its own task, after `max(delay_seconds, 0)`.
    /// Must be called from within a Tokio runtime.
    pub fn arm<F, Fut>(
        &self,
        identity: ChatId,
        delay_seconds: f64,
        due_at: DateTime<FixedOffset>,
        on_fire: F,
    ) -> ReminderHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = clamp_delay(delay_seconds);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;

        let mut slots = lock_slots(&self.slots);

        if let Some(previous) = slots.remove(&identity) {
            previous.task.abort();
            debug!(
                chat_id = %identity,
                replaced_generation = previous.generation,
                "Pending reminder replaced"
            );
        }

        let shared = Arc::clone(&self.slots);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let still_armed = {
                let mut slots = lock_slots(&shared);
                match slots.get(&identity) {
                    Some(pending) if pending.generation == generation => {
                        slots.remove(&identity);
                        true
                    }
                    _ => false,
                }
            };

            if still_armed {
                info!(chat_id = %identity, generation, "Reminder fired");
                tokio::spawn(on_fire());
            } else {
                debug!(chat_id = %identity, generation, "Stale reminder skipped");
            }
        });

        slots.insert(
            identity,
            PendingReminder {
                generation,
                due_at,
                task,
            },
        );

        info!(
            chat_id = %identity,
            generation,
            due_at = %due_at,
            delay_secs = delay.as_secs(),
            "Reminder armed"
        );

        ReminderHandle {
            identity,
            generation,
            due_at,
            delay,
        }
    }

    /// Cancel the pending reminder for `identity`.
    /// Returns whether one was pending; cancelling nothing is a no-op.
    pub fn cancel(&self, identity: ChatId) -> bool {
        let removed = lock_slots(&self.slots).remove(&identity);

        match removed {
            Some(pending) => {
                pending.task.abort();
                info!(chat_id = %identity, generation = pending.generation, "Reminder cancelled");
                true
            }
            None => {
                debug!(chat_id = %identity, "No reminder to cancel");
                false
            }
        }
    }

    /// Due time of the pending reminder for `identity`
    pub fn pending(&self, identity: ChatId) -> Option<DateTime<FixedOffset>> {
        lock_slots(&self.slots).get(&identity).map(|p| p.due_at)
    }

    /// Number of chats with a pending reminder
    pub fn pending_count(&self) -> usize {
        lock_slots(&self.slots).len()
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for (_, pending) in lock_slots(&self.slots).drain() {
            pending.task.abort();
        }
    }
}
