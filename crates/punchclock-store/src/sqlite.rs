//! SQLite-based store implementation

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use punchclock_util::{SessionId, WorkZone};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{OpenOutcome, SessionStore, StoreError, StoreResult, WorkSession};

/// Rows written by earlier releases hold wall-clock time without an offset
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
    /// Zone for timestamps stored without an offset
    zone: WorkZone,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            zone: WorkZone::utc(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            zone: WorkZone::utc(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Read timestamps stored without an offset as wall-clock time in `zone`
    pub fn with_zone(mut self, zone: WorkZone) -> Self {
        self.zone = zone;
        self
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            -- One row per clock-in; clock_out stays NULL while open
            CREATE TABLE IF NOT EXISTS work_times (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                clock_in TEXT NOT NULL,
                clock_out TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_work_times_open
                ON work_times(id) WHERE clock_out IS NULL;
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".into()))
    }
}

fn parse_timestamp(value: &str, zone: &WorkZone) -> StoreResult<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts);
    }

    let naive = NaiveDateTime::parse_from_str(value, LEGACY_TIMESTAMP_FORMAT)?;
    zone.localize(naive).ok_or_else(|| {
        StoreError::Serialization(format!("timestamp '{}' does not exist in {}", value, zone))
    })
}

fn row_to_session(
    id: i64,
    clock_in: String,
    clock_out: Option<String>,
    zone: &WorkZone,
) -> StoreResult<WorkSession> {
    Ok(WorkSession {
        id: SessionId::new(id),
        clock_in: parse_timestamp(&clock_in, zone)?,
        clock_out: clock_out
            .as_deref()
            .map(|value| parse_timestamp(value, zone))
            .transpose()?,
    })
}

fn insert_row(conn: &Connection, clock_in: DateTime<FixedOffset>) -> StoreResult<WorkSession> {
    conn.execute(
        "INSERT INTO work_times (clock_in, clock_out) VALUES (?, NULL)",
        params![clock_in.to_rfc3339()],
    )?;

    let id = SessionId::new(conn.last_insert_rowid());
    debug!(session_id = %id, clock_in = %clock_in, "Work session inserted");

    Ok(WorkSession {
        id,
        clock_in,
        clock_out: None,
    })
}

fn most_recent_open(conn: &Connection, zone: &WorkZone) -> StoreResult<Option<WorkSession>> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, clock_in FROM work_times WHERE clock_out IS NULL ORDER BY id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    row.map(|(id, clock_in)| row_to_session(id, clock_in, None, zone))
        .transpose()
}

fn set_clock_out(
    conn: &Connection,
    id: SessionId,
    clock_out: DateTime<FixedOffset>,
) -> StoreResult<()> {
    let updated = conn.execute(
        "UPDATE work_times SET clock_out = ? WHERE id = ? AND clock_out IS NULL",
        params![clock_out.to_rfc3339(), id.as_i64()],
    )?;

    if updated == 0 {
        return Err(StoreError::NotFound(format!("open work session {}", id)));
    }

    debug!(session_id = %id, clock_out = %clock_out, "Work session closed");
    Ok(())
}

impl SessionStore for SqliteStore {
    fn insert(&self, clock_in: DateTime<FixedOffset>) -> StoreResult<WorkSession> {
        let conn = self.lock()?;
        insert_row(&conn, clock_in)
    }

    fn find_most_recent_open(&self) -> StoreResult<Option<WorkSession>> {
        let conn = self.lock()?;
        most_recent_open(&conn, &self.zone)
    }

    fn update_clock_out(
        &self,
        id: SessionId,
        clock_out: DateTime<FixedOffset>,
    ) -> StoreResult<()> {
        let conn = self.lock()?;
        set_clock_out(&conn, id, clock_out)
    }

    fn list_closed(&self) -> StoreResult<Vec<WorkSession>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, clock_in, clock_out FROM work_times WHERE clock_out IS NOT NULL ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let clock_in: String = row.get(1)?;
            let clock_out: Option<String> = row.get(2)?;
            Ok((id, clock_in, clock_out))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, clock_in, clock_out) = row?;
            sessions.push(row_to_session(id, clock_in, clock_out, &self.zone)?);
        }

        Ok(sessions)
    }

    fn count_open(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM work_times WHERE clock_out IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn insert_if_none_open(&self, clock_in: DateTime<FixedOffset>) -> StoreResult<OpenOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(open) = most_recent_open(&tx, &self.zone)? {
            debug!(session_id = %open.id, "Clock-in refused, session already open");
            return Ok(OpenOutcome::AlreadyOpen(open));
        }

        let session = insert_row(&tx, clock_in)?;
        tx.commit()?;
        Ok(OpenOutcome::Inserted(session))
    }

    fn close_most_recent_open(
        &self,
        clock_out: DateTime<FixedOffset>,
    ) -> StoreResult<Option<WorkSession>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut session) = most_recent_open(&tx, &self.zone)? else {
            return Ok(None);
        };

        set_clock_out(&tx, session.id, clock_out)?;
        tx.commit()?;

        session.clock_out = Some(clock_out);
        Ok(Some(session))
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
