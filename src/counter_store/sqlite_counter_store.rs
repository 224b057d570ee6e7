use super::versioned_schema::VERSIONED_SCHEMAS;
use super::{CounterStore, StoreError, StoreWrite};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed counter store. One transaction per batch is the atomic
/// pipeline primitive; counters spring into existence on first increment.
pub struct SqliteCounterStore {
    conn: Mutex<Connection>,
}

const BASE_DB_VERSION: i32 = 310;
const CURRENT_DB_VERSION: i32 = 0;

impl SqliteCounterStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = if db_path.as_ref().exists() {
            Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            let conn = Connection::open(db_path)?;
            Self::create_schema(&conn)?;
            conn
        };

        let version: i32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .context("Failed to read counter database version")?;

        match version - BASE_DB_VERSION {
            0 => Self::validate_schema_0(&conn)?,
            _ => bail!("Unknown counter database version {}", version),
        }

        Ok(SqliteCounterStore {
            conn: Mutex::new(conn),
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        for schema in VERSIONED_SCHEMAS {
            for table in schema.tables {
                conn.execute(table.schema, [])?;
                for index in table.indices {
                    conn.execute(index, [])?;
                }
            }
        }
        conn.execute(
            &format!(
                "PRAGMA user_version = {}",
                BASE_DB_VERSION + CURRENT_DB_VERSION
            ),
            [],
        )?;
        Ok(())
    }

    fn validate_schema_0(conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare("PRAGMA table_info(counters);")?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))?
            .collect::<Result<_, _>>()?;
        if columns != ["tbl", "field", "count"] {
            bail!(
                "Schema validation failed for counters table, found {:?}",
                columns
            );
        }

        let mut stmt = conn.prepare("PRAGMA table_info(entries);")?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))?
            .collect::<Result<_, _>>()?;
        if columns != ["tbl", "field", "value", "created"] {
            bail!(
                "Schema validation failed for entries table, found {:?}",
                columns
            );
        }

        Ok(())
    }
}

impl CounterStore for SqliteCounterStore {
    fn apply(&self, batch: &[StoreWrite]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for write in batch {
            match write {
                StoreWrite::Increment { table, field, delta } => {
                    tx.execute(
                        "INSERT INTO counters (tbl, field, count) VALUES (?1, ?2, ?3) \
                         ON CONFLICT (tbl, field) DO UPDATE SET count = count + excluded.count",
                        params![table, field, *delta as i64],
                    )?;
                }
                StoreWrite::Append { table, field, value } => {
                    tx.execute(
                        "INSERT OR IGNORE INTO entries (tbl, field, value) VALUES (?1, ?2, ?3)",
                        params![table, field, value],
                    )?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn read_counters(&self, table: &str) -> Result<HashMap<String, u64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT field, count FROM counters WHERE tbl = ?1")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut out = HashMap::new();
        for row in rows {
            let (field, count) = row?;
            out.insert(field, count.max(0) as u64);
        }
        Ok(out)
    }

    fn read_entries(&self, table: &str) -> Result<HashMap<String, String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT field, value FROM entries WHERE tbl = ?1")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut out = HashMap::new();
        for row in rows {
            let (field, value) = row?;
            out.insert(field, value);
        }
        Ok(out)
    }

    fn list_tables(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT tbl FROM counters WHERE tbl LIKE ?1 ORDER BY tbl")?;
        let pattern = format!("{}%", prefix);
        let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn prune_entries(&self, table: &str, keep: usize) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM entries WHERE tbl = ?1 AND field NOT IN \
             (SELECT field FROM entries WHERE tbl = ?1 ORDER BY field DESC LIMIT ?2)",
            params![table, keep as i64],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteCounterStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("counters.db");
        let store = SqliteCounterStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn counters_start_at_zero_and_accumulate() {
        let (store, _temp_dir) = create_tmp_store();

        assert!(store.read_counters("listen_counts").unwrap().is_empty());

        store
            .apply(&[StoreWrite::increment("listen_counts", "music/a/b/c.mp3")])
            .unwrap();
        store
            .apply(&[StoreWrite::increment("listen_counts", "music/a/b/c.mp3")])
            .unwrap();

        let counts = store.read_counters("listen_counts").unwrap();
        assert_eq!(counts.get("music/a/b/c.mp3"), Some(&2));
    }

    #[test]
    fn batch_applies_every_write() {
        let (store, _temp_dir) = create_tmp_store();

        store
            .apply(&[
                StoreWrite::increment("listen_counts", "t"),
                StoreWrite::increment("stats:browsers", "Firefox"),
                StoreWrite::increment("stats:os", "Linux"),
                StoreWrite::append("diagnostic_logs", "2024-01-01T00:00:00Z-1.2.3.4", "{}"),
            ])
            .unwrap();

        assert_eq!(store.read_counters("listen_counts").unwrap().len(), 1);
        assert_eq!(store.read_counters("stats:browsers").unwrap().len(), 1);
        assert_eq!(store.read_counters("stats:os").unwrap().len(), 1);
        assert_eq!(store.read_entries("diagnostic_logs").unwrap().len(), 1);
    }

    #[test]
    fn append_never_overwrites() {
        let (store, _temp_dir) = create_tmp_store();

        store
            .apply(&[StoreWrite::append("diagnostic_logs", "key", "first")])
            .unwrap();
        store
            .apply(&[StoreWrite::append("diagnostic_logs", "key", "second")])
            .unwrap();

        let entries = store.read_entries("diagnostic_logs").unwrap();
        assert_eq!(entries.get("key").map(String::as_str), Some("first"));
    }

    #[test]
    fn lists_tables_by_prefix() {
        let (store, _temp_dir) = create_tmp_store();

        store
            .apply(&[
                StoreWrite::increment("events:music/a/b/c.mp3", "30s_listen"),
                StoreWrite::increment("events:music/a/b/d.mp3", "track_start"),
                StoreWrite::increment("listen_counts", "music/a/b/c.mp3"),
            ])
            .unwrap();

        let tables = store.list_tables("events:").unwrap();
        assert_eq!(
            tables,
            vec![
                "events:music/a/b/c.mp3".to_string(),
                "events:music/a/b/d.mp3".to_string()
            ]
        );
    }

    #[test]
    fn prunes_to_newest_entries() {
        let (store, _temp_dir) = create_tmp_store();

        for i in 0..5 {
            store
                .apply(&[StoreWrite::append(
                    "diagnostic_logs",
                    format!("2024-01-0{}T00:00:00Z-ip", i + 1),
                    format!("entry-{}", i),
                )])
                .unwrap();
        }

        let deleted = store.prune_entries("diagnostic_logs", 2).unwrap();
        assert_eq!(deleted, 3);

        let remaining = store.read_entries("diagnostic_logs").unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains_key("2024-01-05T00:00:00Z-ip"));
        assert!(remaining.contains_key("2024-01-04T00:00:00Z-ip"));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let store =
            Arc::new(SqliteCounterStore::new(temp_dir.path().join("counters.db")).unwrap());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    store
                        .apply(&[StoreWrite::increment("listen_counts", "track")])
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let counts = store.read_counters("listen_counts").unwrap();
        assert_eq!(counts.get("track"), Some(&400));
    }

    #[test]
    fn reopens_existing_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("counters.db");

        {
            let store = SqliteCounterStore::new(&db_path).unwrap();
            store
                .apply(&[StoreWrite::increment("listen_counts", "track")])
                .unwrap();
        }

        let store = SqliteCounterStore::new(&db_path).unwrap();
        let counts = store.read_counters("listen_counts").unwrap();
        assert_eq!(counts.get("track"), Some(&1));
    }
}
