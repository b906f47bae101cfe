//! SQLite backend. Every call blocks and is run off the async runtime by
//! [`crate::Gateway`].

use chrono::{DateTime, NaiveDateTime};
use loggino_core::LogRecord;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schema::{ColumnSpec, SchemaReport};
use crate::{StoreError, LOG_TABLE};

/// The collector may hold a write lock while flushing a batch
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// SQLite cannot add a primary key to an existing table, so `id` is added as
/// a plain integer, backfilled from `rowid` and kept assigned by a trigger.
pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "ai_response",
        definition: "TEXT DEFAULT NULL",
        follow_up: &[],
    },
    ColumnSpec {
        name: "id",
        definition: "INTEGER",
        follow_up: &[
            "UPDATE {table} SET id = rowid",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_id ON {table}(id)",
            "CREATE TRIGGER IF NOT EXISTS {table}_assign_id AFTER INSERT ON {table}
             FOR EACH ROW WHEN NEW.id IS NULL
             BEGIN
                 UPDATE {table} SET id = NEW.rowid WHERE rowid = NEW.rowid;
             END",
        ],
    },
    ColumnSpec {
        name: "unique_error",
        definition: "TEXT DEFAULT NULL",
        follow_up: &["CREATE INDEX IF NOT EXISTS idx_{table}_unique_error ON {table}(unique_error)"],
    },
];

/// A database file owned by the collector. It is never created here.
#[derive(Debug, Clone)]
pub(crate) struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fresh connection, closed when dropped
    pub fn connect(&self) -> Result<Connection, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&self.path, flags).map_err(|source| {
            tracing::error!(path = %self.path.display(), error = %source, "database connection failed");
            StoreError::Connect {
                target: self.path.display().to_string(),
                source: Box::new(source),
            }
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::debug!(path = %self.path.display(), "connected to database");
        Ok(conn)
    }

    pub fn fetch_newest_first(&self) -> Result<Vec<LogRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, tag, time, data, ai_response, unique_error
             FROM {} ORDER BY id DESC",
            LOG_TABLE
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(LogRecord {
                id: row.get(0)?,
                tag: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                time: decode_time(row.get_ref(2)?, 2)?,
                data: row.get::<_, Option<String>>(3)?.unwrap_or_else(|| "{}".to_string()),
                ai_response: row.get(4)?,
                unique_error: row.get(5)?,
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn set_unique_error(&self, id: i64, signature: &str) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            &format!("UPDATE {} SET unique_error = ?1 WHERE id = ?2", LOG_TABLE),
            params![signature, id],
        )?;
        Ok(updated)
    }

    pub fn cached_annotation(&self, signature: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let cached = conn
            .query_row(
                &format!(
                    "SELECT ai_response FROM {}
                     WHERE unique_error = ?1 AND ai_response IS NOT NULL
                     LIMIT 1",
                    LOG_TABLE
                ),
                params![signature],
                |row| row.get(0),
            )
            .optional()?;
        Ok(cached)
    }

    pub fn set_ai_response(&self, id: i64, text: &str) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            &format!("UPDATE {} SET ai_response = ?1 WHERE id = ?2", LOG_TABLE),
            params![text, id],
        )?;
        Ok(updated)
    }

    pub fn ensure_columns(&self, specs: &[ColumnSpec]) -> Result<SchemaReport, StoreError> {
        let mut conn = self.connect()?;

        if !table_exists(&conn)? {
            return Err(StoreError::MissingTable(LOG_TABLE));
        }

        let mut report = SchemaReport::default();
        for spec in specs {
            let outcome = column_exists(&conn, spec.name).and_then(|exists| {
                if exists {
                    Ok(false)
                } else {
                    add_column(&mut conn, spec).map(|_| true)
                }
            });
            report.record(spec.name, outcome.map_err(StoreError::from));
        }
        Ok(report)
    }
}

fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![LOG_TABLE],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_exists(conn: &Connection, column: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        params![LOG_TABLE, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn add_column(conn: &mut Connection, spec: &ColumnSpec) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", LOG_TABLE, spec.name, spec.definition),
        [],
    )?;
    for statement in spec.follow_up_statements() {
        tx.execute_batch(&statement)?;
    }
    tx.commit()
}

/// Collector timestamps arrive as text (with or without offset) or unix seconds
fn decode_time(value: ValueRef<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let decoded = match value {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            parse_time_text(text.trim())
        }
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc()),
        ValueRef::Real(secs) => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9) as u32;
            DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
        }
        _ => None,
    };

    decoded.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            value.data_type(),
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "unrecognized time value",
            )),
        )
    })
}

fn parse_time_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector_db(dir: &tempfile::TempDir) -> SqliteStore {
        let path = dir.path().join("logs.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE logs (tag TEXT, time TEXT, data TEXT);
             INSERT INTO logs VALUES ('app', '2024-01-01 10:00:00', '{\"log\": \"a\"}');
             INSERT INTO logs VALUES ('app', '2024-01-01 10:00:01', '{\"log\": \"b\"}');",
        )
        .unwrap();
        SqliteStore::new(path)
    }

    #[test]
    fn test_connect_does_not_create_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let store = SqliteStore::new(&path);

        assert!(matches!(store.connect(), Err(StoreError::Connect { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_adds_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = collector_db(&dir);

        let report = store.ensure_columns(COLUMNS).unwrap();
        assert_eq!(report.added, vec!["ai_response", "id", "unique_error"]);
        assert!(report.present.is_empty());
        assert!(report.is_complete());

        let conn = store.connect().unwrap();
        for column in ["ai_response", "id", "unique_error"] {
            assert!(column_exists(&conn, column).unwrap());
        }
    }

    #[test]
    fn test_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = collector_db(&dir);

        store.ensure_columns(COLUMNS).unwrap();
        let second = store.ensure_columns(COLUMNS).unwrap();
        assert!(second.added.is_empty());
        assert_eq!(second.present, vec!["ai_response", "id", "unique_error"]);
    }

    #[test]
    fn test_id_backfilled_and_assigned_for_new_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = collector_db(&dir);
        store.ensure_columns(COLUMNS).unwrap();

        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO logs (tag, time, data) VALUES ('app', '2024-01-01 10:00:02', '{}')",
            [],
        )
        .unwrap();

        let ids: Vec<i64> = conn
            .prepare("SELECT id FROM logs ORDER BY rowid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_failed_column_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = collector_db(&dir);

        let specs = [
            ColumnSpec {
                name: "broken",
                definition: "TEXT REFERENCES",
                follow_up: &[],
            },
            ColumnSpec {
                name: "unique_error",
                definition: "TEXT DEFAULT NULL",
                follow_up: &[],
            },
        ];
        let report = store.ensure_columns(&specs).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert_eq!(report.added, vec!["unique_error"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("PRAGMA user_version = 1")
            .unwrap();

        let store = SqliteStore::new(path);
        assert!(matches!(
            store.ensure_columns(COLUMNS),
            Err(StoreError::MissingTable("logs"))
        ));
    }

    #[test]
    fn test_parse_time_text() {
        let plain = parse_time_text("2024-01-01 10:00:00").unwrap();
        assert_eq!(plain.to_string(), "2024-01-01 10:00:00");

        let iso = parse_time_text("2024-01-01T10:00:00.250").unwrap();
        assert_eq!(iso.format("%H:%M:%S%.3f").to_string(), "10:00:00.250");

        let offset = parse_time_text("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(offset.to_string(), "2024-01-01 10:00:00");

        assert!(parse_time_text("yesterday").is_none());
    }

    #[test]
    fn test_decode_unix_seconds() {
        let dt = decode_time(ValueRef::Integer(1_704_103_200), 0).unwrap();
        assert_eq!(dt.to_string(), "2024-01-01 10:00:00");
        assert!(decode_time(ValueRef::Null, 0).is_err());
    }
}
