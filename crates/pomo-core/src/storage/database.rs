//! SQLite-backed session log.
//!
//! One row per finished timer run. The log is append-only: records are
//! never updated or deleted, and every report is recomputed from the
//! rows it loads.
//!
//! Timestamps are stored as RFC 3339 UTC text with a fixed layout so
//! that string comparison in SQL matches chronological order. Durations
//! are stored as integer nanoseconds for a lossless round-trip.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;

/// One persisted summary of a finished timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Store-assigned rowid; used only for ordering.
    pub id: i64,
    /// Wall-clock start of the run; the sole temporal basis for
    /// bucketing and streaks.
    pub started_at: DateTime<Utc>,
    /// Free-text session title; empty means unset.
    #[serde(default)]
    pub title: String,
    /// Free-text goal label; empty means unset.
    #[serde(default)]
    pub goal_label: String,
    pub completed_pomos: u32,
    pub skipped_sessions: u32,
    pub work_time: Duration,
    pub break_time: Duration,
    pub total_duration: Duration,
}

/// SQLite store for session records.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open the store at `<data_dir>/pomo.db`, creating file and schema
    /// as needed.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be
    /// opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(data_dir()?.join("pomo.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at       TEXT NOT NULL,
                title            TEXT NOT NULL DEFAULT '',
                goal_label       TEXT NOT NULL DEFAULT '',
                completed_pomos  INTEGER NOT NULL,
                skipped_sessions INTEGER NOT NULL,
                work_time        INTEGER NOT NULL,
                break_time       INTEGER NOT NULL,
                total_duration   INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_goal_label ON sessions(goal_label);",
        )?;
        Ok(())
    }

    /// Append a record to the log, returning its assigned id.
    ///
    /// The caller only hands over runs with at least one completed
    /// pomodoro; zero-pomodoro runs are discarded upstream and never
    /// reach the store.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn save_record(&self, record: &SessionRecord) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO sessions (started_at, title, goal_label, completed_pomos,
                                   skipped_sessions, work_time, break_time, total_duration)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                format_timestamp(record.started_at),
                record.title,
                record.goal_label,
                record.completed_pomos,
                record.skipped_sessions,
                duration_nanos(record.work_time),
                duration_nanos(record.break_time),
                duration_nanos(record.total_duration),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Load every record, newest first.
    pub fn load_all(&self) -> Result<Vec<SessionRecord>, StorageError> {
        self.query_records(
            "SELECT id, started_at, title, goal_label, completed_pomos, skipped_sessions,
                    work_time, break_time, total_duration
             FROM sessions
             ORDER BY started_at DESC",
            params![],
        )
    }

    /// Load records started at or after `since`, newest first.
    pub fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<SessionRecord>, StorageError> {
        self.query_records(
            "SELECT id, started_at, title, goal_label, completed_pomos, skipped_sessions,
                    work_time, break_time, total_duration
             FROM sessions
             WHERE started_at >= ?1
             ORDER BY started_at DESC",
            params![format_timestamp(since)],
        )
    }

    /// Load records with `start <= started_at <= end`, newest first.
    pub fn records_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        self.query_records(
            "SELECT id, started_at, title, goal_label, completed_pomos, skipped_sessions,
                    work_time, break_time, total_duration
             FROM sessions
             WHERE started_at >= ?1 AND started_at <= ?2
             ORDER BY started_at DESC",
            params![format_timestamp(start), format_timestamp(end)],
        )
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Fixed-layout RFC 3339 UTC text; keeps SQL string comparison
/// chronological.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn duration_nanos(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let raw_ts: String = row.get(1)?;
    // One corrupt row must not block an entire report: degrade to the
    // epoch instead of failing the load.
    let started_at = DateTime::parse_from_rfc3339(&raw_ts)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|err| {
            tracing::warn!(raw = %raw_ts, error = %err, "unparseable session timestamp");
            DateTime::UNIX_EPOCH
        });

    let work_nanos: i64 = row.get(6)?;
    let break_nanos: i64 = row.get(7)?;
    let total_nanos: i64 = row.get(8)?;

    Ok(SessionRecord {
        id: row.get(0)?,
        started_at,
        title: row.get(2)?,
        goal_label: row.get(3)?,
        completed_pomos: row.get(4)?,
        skipped_sessions: row.get(5)?,
        work_time: Duration::from_nanos(work_nanos.max(0) as u64),
        break_time: Duration::from_nanos(break_nanos.max(0) as u64),
        total_duration: Duration::from_nanos(total_nanos.max(0) as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(ts: DateTime<Utc>, pomos: u32) -> SessionRecord {
        SessionRecord {
            id: 0,
            started_at: ts,
            title: "deep work".into(),
            goal_label: String::new(),
            completed_pomos: pomos,
            skipped_sessions: 1,
            work_time: Duration::from_secs(25 * 60 * pomos as u64),
            break_time: Duration::from_secs(5 * 60),
            total_duration: Duration::from_secs(30 * 60 * pomos as u64),
        }
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = SessionStore::open_memory().unwrap();
        let mut rec = record_at(utc(2024, 3, 4, 9), 3);
        let id = store.save_record(&rec).unwrap();
        rec.id = id;

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![rec]);
    }

    #[test]
    fn test_duration_roundtrip_is_lossless() {
        let store = SessionStore::open_memory().unwrap();
        let mut rec = record_at(utc(2024, 3, 4, 9), 1);
        rec.work_time = Duration::from_nanos(1_499_999_999);
        store.save_record(&rec).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded[0].work_time, Duration::from_nanos(1_499_999_999));
    }

    #[test]
    fn test_records_ordered_newest_first() {
        let store = SessionStore::open_memory().unwrap();
        store.save_record(&record_at(utc(2024, 3, 4, 9), 1)).unwrap();
        store.save_record(&record_at(utc(2024, 3, 6, 9), 1)).unwrap();
        store.save_record(&record_at(utc(2024, 3, 5, 9), 1)).unwrap();

        let loaded = store.load_all().unwrap();
        let days: Vec<u32> = loaded
            .iter()
            .map(|r| chrono::Datelike::day(&r.started_at))
            .collect();
        assert_eq!(days, vec![6, 5, 4]);
    }

    #[test]
    fn test_records_since_filters_older() {
        let store = SessionStore::open_memory().unwrap();
        store.save_record(&record_at(utc(2024, 3, 4, 9), 1)).unwrap();
        store.save_record(&record_at(utc(2024, 3, 6, 9), 1)).unwrap();

        let loaded = store.records_since(utc(2024, 3, 5, 0)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].started_at, utc(2024, 3, 6, 9));
    }

    #[test]
    fn test_records_in_range_is_inclusive() {
        let store = SessionStore::open_memory().unwrap();
        store.save_record(&record_at(utc(2024, 3, 4, 9), 1)).unwrap();
        store.save_record(&record_at(utc(2024, 3, 5, 9), 1)).unwrap();
        store.save_record(&record_at(utc(2024, 3, 6, 9), 1)).unwrap();

        let loaded = store
            .records_in_range(utc(2024, 3, 4, 9), utc(2024, 3, 5, 9))
            .unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_malformed_timestamp_degrades_to_epoch() {
        let store = SessionStore::open_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO sessions (started_at, title, goal_label, completed_pomos,
                                       skipped_sessions, work_time, break_time, total_duration)
                 VALUES ('not-a-date', '', '', 2, 0, 0, 0, 0)",
                params![],
            )
            .unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].started_at, DateTime::UNIX_EPOCH);
        assert_eq!(loaded[0].completed_pomos, 2);
    }
}
