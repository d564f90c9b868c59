//! Session tracker and time budget

use chrono::{DateTime, FixedOffset, TimeDelta};
use punchclock_store::{OpenOutcome, SessionStore, StoreError, WorkSession};
use punchclock_util::{duration_hours, seconds_to_duration};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("A work session is already open since {}", .0.clock_in)]
    SessionAlreadyOpen(WorkSession),

    #[error("No ongoing work session")]
    NoOpenSession,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Outcome of a successful clock-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockOut {
    /// The session as closed
    pub session: WorkSession,
    /// `clock_out - clock_in`, negative if the clock went backwards
    pub worked: TimeDelta,
}

impl ClockOut {
    pub fn worked_hours(&self) -> f64 {
        duration_hours(self.worked)
    }
}

/// When the reminder for a freshly opened session is due
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPlan {
    /// Seconds from clock-in until the budget is balanced; may be negative
    pub due_offset_seconds: f64,
    /// Suggested clock-out time
    pub due_at: DateTime<FixedOffset>,
    /// Clock-in plus one quota, ignoring the budget
    pub regular_end: DateTime<FixedOffset>,
}

/// Sum of `(hours worked - quota)` over closed sessions.
/// Open sessions are skipped.
pub fn time_budget_hours(sessions: &[WorkSession], daily_quota_hours: f64) -> f64 {
    sessions
        .iter()
        .filter_map(WorkSession::worked)
        .map(|worked| duration_hours(worked) - daily_quota_hours)
        .sum()
}

/// Tracks work sessions for the single authorized user
pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
    daily_quota_hours: f64,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>, daily_quota_hours: f64) -> Self {
        info!(daily_quota_hours, "Session tracker initialized");
        Self {
            store,
            daily_quota_hours,
        }
    }

    pub fn daily_quota_hours(&self) -> f64 {
        self.daily_quota_hours
    }

    /// Open a new session at `now`.
    ///
    /// Refuses with [`TrackerError::SessionAlreadyOpen`] while another
    /// session is open; the check and the insert are one store transaction.
    pub fn clock_in(&self, now: DateTime<FixedOffset>) -> TrackerResult<WorkSession> {
        match self.store.insert_if_none_open(now)? {
            OpenOutcome::Inserted(session) => {
                info!(session_id = %session.id, clock_in = %session.clock_in, "Clocked in");
                Ok(session)
            }
            OpenOutcome::AlreadyOpen(open) => {
                warn!(
                    session_id = %open.id,
                    open_since = %open.clock_in,
                    "Clock-in refused, session already open"
                );
                Err(TrackerError::SessionAlreadyOpen(open))
            }
        }
    }

    /// Close the most recently opened session at `now`.
    pub fn clock_out(&self, now: DateTime<FixedOffset>) -> TrackerResult<ClockOut> {
        let Some(session) = self.store.close_most_recent_open(now)? else {
            warn!("No ongoing work session found or already clocked out");
            return Err(TrackerError::NoOpenSession);
        };

        let worked = now - session.clock_in;
        if worked < TimeDelta::zero() {
            warn!(
                session_id = %session.id,
                clock_in = %session.clock_in,
                clock_out = %now,
                "Clock-out precedes clock-in, worked duration is negative"
            );
        }

        info!(
            session_id = %session.id,
            clock_out = %now,
            worked_secs = worked.num_seconds(),
            "Clocked out"
        );

        Ok(ClockOut { session, worked })
    }

    /// Cumulative overtime (positive) or undertime (negative) in hours
    pub fn time_budget_hours(&self) -> TrackerResult<f64> {
        let closed = self.store.list_closed()?;
        let budget = time_budget_hours(&closed, self.daily_quota_hours);
        debug!(closed_sessions = closed.len(), budget_hours = budget, "Time budget computed");
        Ok(budget)
    }

    /// Seconds of work left until the budget is balanced, counting only
    /// closed sessions. Negative when already in overtime.
    pub fn due_offset_seconds(&self) -> TrackerResult<f64> {
        let budget = self.time_budget_hours()?;
        Ok(self.daily_quota_hours * SECONDS_PER_HOUR - budget * SECONDS_PER_HOUR)
    }

    /// Reminder timing for a session opened at `clock_in`
    pub fn plan_reminder(&self, clock_in: DateTime<FixedOffset>) -> TrackerResult<ReminderPlan> {
        let due_offset_seconds = self.due_offset_seconds()?;
        Ok(ReminderPlan {
            due_offset_seconds,
            due_at: clock_in + seconds_to_duration(due_offset_seconds),
            regular_end: clock_in
                + seconds_to_duration(self.daily_quota_hours * SECONDS_PER_HOUR),
        })
    }

    /// The currently open session, if any
    pub fn open_session(&self) -> TrackerResult<Option<WorkSession>> {
        Ok(self.store.find_most_recent_open()?)
    }
}
