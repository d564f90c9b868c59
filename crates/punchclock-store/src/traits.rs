//! Store trait definitions

use chrono::{DateTime, FixedOffset, TimeDelta};
use punchclock_util::SessionId;

use crate::StoreResult;

/// One clock-in/clock-out interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkSession {
    pub id: SessionId,
    pub clock_in: DateTime<FixedOffset>,
    /// `None` while the session is ongoing
    pub clock_out: Option<DateTime<FixedOffset>>,
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Signed worked duration of a closed session
    pub fn worked(&self) -> Option<TimeDelta> {
        self.clock_out.map(|out| out - self.clock_in)
    }
}

/// Result of an atomic clock-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new open session was recorded
    Inserted(WorkSession),
    /// Nothing was written; this session is still open
    AlreadyOpen(WorkSession),
}

/// Record store for work sessions
pub trait SessionStore: Send + Sync {
    // Primitive record operations

    /// Append a new open session
    fn insert(&self, clock_in: DateTime<FixedOffset>) -> StoreResult<WorkSession>;

    /// The open session with the highest id, if any
    fn find_most_recent_open(&self) -> StoreResult<Option<WorkSession>>;

    /// Close an open session
    fn update_clock_out(&self, id: SessionId, clock_out: DateTime<FixedOffset>)
        -> StoreResult<()>;

    /// All closed sessions in creation order
    fn list_closed(&self) -> StoreResult<Vec<WorkSession>>;

    /// Number of open sessions; more than one only occurs in legacy data
    fn count_open(&self) -> StoreResult<usize>;

    // Atomic compound operations

    /// Insert an open session unless one is already open, in one transaction
    fn insert_if_none_open(&self, clock_in: DateTime<FixedOffset>) -> StoreResult<OpenOutcome>;

    /// Close the most recent open session, in one transaction.
    /// Returns the closed session, or `None` if nothing was open.
    fn close_most_recent_open(
        &self,
        clock_out: DateTime<FixedOffset>,
    ) -> StoreResult<Option<WorkSession>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
