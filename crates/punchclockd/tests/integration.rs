//! Integration tests for punchclockd
//!
//! These tests drive the same pieces the service wires together, with an
//! on-disk store and the in-process transport.

use punchclock_bot::{replies, ChatTransport, Dispatcher, FailureNotifier, MockTransport};
use punchclock_core::{ReminderScheduler, SessionTracker};
use punchclock_store::{SessionStore, SqliteStore};
use punchclock_util::{parse_time_zone, ChatId, DATABASE_FILENAME};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const CHAT: i64 = 4242;
const INTRUDER: i64 = 13;
// 2024-03-04 08:00:00 UTC
const T0: i64 = 1_709_539_200;
const HOUR: i64 = 3600;

struct Harness {
    dispatcher: Dispatcher,
    scheduler: Arc<ReminderScheduler>,
    transport: Arc<MockTransport>,
    store: Arc<SqliteStore>,
    notifier: FailureNotifier,
    offset: Option<i64>,
}

impl Harness {
    fn open(db_path: &Path) -> Self {
        let zone = parse_time_zone("+01:00").unwrap();
        let store = Arc::new(SqliteStore::open(db_path).unwrap().with_zone(zone));
        let tracker = Arc::new(SessionTracker::new(store.clone(), 9.0));
        let scheduler = Arc::new(ReminderScheduler::new());
        let transport = MockTransport::new();
        let dispatcher = Dispatcher::new(
            tracker,
            scheduler.clone(),
            transport.clone(),
            ChatId::new(CHAT),
            zone,
        );

        Self {
            dispatcher,
            scheduler,
            transport,
            store,
            notifier: FailureNotifier::disabled(),
            offset: None,
        }
    }

    /// One pass of the service loop
    async fn poll_once(&mut self) {
        let updates = self
            .transport
            .get_updates(self.offset, Duration::from_secs(1))
            .await
            .unwrap();
        for update in updates {
            self.offset = Some(update.update_id + 1);
            if let Some(message) = &update.message {
                self.dispatcher.respond(message, &self.notifier).await;
            }
        }
    }

    async fn say(&mut self, chat: i64, text: &str, sent_at: i64) -> Option<String> {
        let before = self.transport.sent().len();
        self.transport.push_text(ChatId::new(chat), text, sent_at);
        self.poll_once().await;
        self.transport.sent().into_iter().nth(before).map(|(_, text)| text)
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_workday() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::open(&dir.path().join(DATABASE_FILENAME));

    let reply = h.say(CHAT, "/clock_in", T0).await.unwrap();
    assert!(reply.contains("Clocked in at 2024-03-04 09:00:00"), "{reply}");
    assert_eq!(h.scheduler.pending_count(), 1);

    let reply = h.say(CHAT, "/clock_out", T0 + HOUR).await.unwrap();
    assert!(reply.contains("You worked 1.0 hours"), "{reply}");
    assert!(reply.contains("-08:00 (-8.00 hours)"), "{reply}");
    assert_eq!(h.scheduler.pending_count(), 0);

    let reply = h.say(CHAT, "/time_budget", T0 + 2 * HOUR).await.unwrap();
    assert_eq!(reply, "Your time budget is -08:00 (-8.00 hours).");

    // Nothing else is ever sent, the reminder was cancelled
    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
    assert_eq!(h.transport.sent().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_reminder_reaches_authorized_chat() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::open(&dir.path().join(DATABASE_FILENAME));

    h.say(CHAT, "/clock_in", T0).await.unwrap();

    let sent = tokio::time::timeout(
        Duration::from_secs(9 * 3600 + 1),
        h.transport.wait_for_sent(2),
    )
    .await
    .unwrap();
    assert_eq!(sent[1], (ChatId::new(CHAT), replies::GO_HOME.to_string()));

    // Firing does not close the session
    assert!(h.store.find_most_recent_open().unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_unauthorized_chat_has_no_effect() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::open(&dir.path().join(DATABASE_FILENAME));

    for text in ["/clock_in", "/clock_out", "/time_budget", "/help"] {
        assert!(h.say(INTRUDER, text, T0).await.is_none());
    }

    assert_eq!(h.store.count_open().unwrap(), 0);
    assert!(h.store.list_closed().unwrap().is_empty());
    assert_eq!(h.scheduler.pending_count(), 0);
    assert!(h.transport.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_budget_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join(DATABASE_FILENAME);

    {
        let mut h = Harness::open(&db_path);
        h.say(CHAT, "/clock_in", T0).await.unwrap();
        h.say(CHAT, "/clock_out", T0 + 10 * HOUR).await.unwrap();
        h.say(CHAT, "/clock_in", T0 + 24 * HOUR).await.unwrap();
    }

    let mut h = Harness::open(&db_path);

    // Reminders live in memory only
    assert_eq!(h.scheduler.pending_count(), 0);

    let reply = h.say(CHAT, "/time_budget", T0 + 25 * HOUR).await.unwrap();
    assert_eq!(reply, "Your time budget is +01:00 (1.00 hours).");

    // The session opened before the restart can still be closed
    let reply = h.say(CHAT, "/clock_out", T0 + 32 * HOUR).await.unwrap();
    assert!(reply.contains("You worked 8.0 hours"), "{reply}");
    assert!(reply.contains("+00:00 (0.00 hours)"), "{reply}");
}

#[tokio::test(start_paused = true)]
async fn test_overtime_shortens_next_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::open(&dir.path().join(DATABASE_FILENAME));

    h.say(CHAT, "/clock_in", T0).await.unwrap();
    h.say(CHAT, "/clock_out", T0 + 11 * HOUR).await.unwrap();

    let next_day = T0 + 24 * HOUR;
    let reply = h.say(CHAT, "/clock_in", next_day).await.unwrap();
    assert!(reply.contains("clock out at 16:00:00"), "{reply}");
    assert!(reply.contains("regular work end time is 18:00:00"), "{reply}");

    let due = h.scheduler.pending(ChatId::new(CHAT)).unwrap();
    assert_eq!(due.timestamp(), next_day + 7 * HOUR);
}

#[tokio::test(start_paused = true)]
async fn test_send_failure_does_not_stop_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::open(&dir.path().join(DATABASE_FILENAME));

    h.transport
        .fail_send
        .store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(h.say(CHAT, "/clock_in", T0).await.is_none());

    // The session was still recorded
    assert_eq!(h.store.count_open().unwrap(), 1);

    h.transport
        .fail_send
        .store(false, std::sync::atomic::Ordering::SeqCst);
    let reply = h.say(CHAT, "/status", T0 + HOUR).await.unwrap();
    assert!(reply.contains("1.0 hours so far"), "{reply}");
}

#[tokio::test(start_paused = true)]
async fn test_reads_database_from_earlier_release() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join(DATABASE_FILENAME);

    // Table and row format written by the earlier bot: no offset, microseconds
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE work_times (
                id INTEGER NOT NULL,
                clock_in DATETIME NOT NULL,
                clock_out DATETIME,
                PRIMARY KEY (id)
            );
            INSERT INTO work_times (clock_in, clock_out)
                VALUES ('2024-03-03 08:00:00.000000', '2024-03-03 18:00:00.000000');",
        )
        .unwrap();
    }

    let mut h = Harness::open(&db_path);

    let reply = h.say(CHAT, "/time_budget", T0).await.unwrap();
    assert_eq!(reply, "Your time budget is +01:00 (1.00 hours).");

    // One hour of overtime moves the reminder from 18:00 to 17:00
    let reply = h.say(CHAT, "/clock_in", T0).await.unwrap();
    assert!(reply.contains("clock out at 17:00:00"), "{reply}");

    let reply = h.say(CHAT, "/clock_out", T0 + 8 * HOUR).await.unwrap();
    assert!(reply.contains("+00:00 (0.00 hours)"), "{reply}");
}
