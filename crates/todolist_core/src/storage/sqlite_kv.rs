//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist opaque string values in the `kv_entries` table.
//!
//! # Invariants
//! - Writes are single-statement upserts, so a value is either fully
//!   replaced or left untouched.
//! - The connection must have migrations applied (see `db::open_db`).

use super::{KeyValueStore, StorageResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable store over a borrowed, migrated connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection after checking its schema is current.
    ///
    /// # Errors
    /// - `DbError::SchemaNotMigrated` when the connection was not produced by
    ///   `open_db`/`open_db_in_memory`.
    /// - `DbError::UnsupportedSchemaVersion` when the schema is from a newer
    ///   build.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let version = current_user_version(conn)?;
        let latest = latest_version();
        if version < latest {
            return Err(DbError::SchemaNotMigrated {
                db_version: version,
                expected: latest,
            }
            .into());
        }
        if version > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            }
            .into());
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKeyValueStore;
    use crate::db::{open_db_in_memory, DbError};
    use crate::storage::{KeyValueStore, StorageError};
    use rusqlite::Connection;

    #[test]
    fn set_then_get_returns_latest_value() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteKeyValueStore::try_new(&conn).unwrap();

        assert_eq!(store.get("todos").unwrap(), None);
        store.set("todos", "[]").unwrap();
        store.set("todos", r#"[{"text":"a"}]"#).unwrap();
        assert_eq!(
            store.get("todos").unwrap().as_deref(),
            Some(r#"[{"text":"a"}]"#)
        );

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueStore::try_new(&conn)
            .err()
            .expect("raw connection must be rejected");
        assert!(matches!(
            err,
            StorageError::Db(DbError::SchemaNotMigrated {
                db_version: 0,
                expected: 1,
            })
        ));
        assert_eq!(
            err.to_string(),
            "database schema version 0 has not been migrated to 1"
        );
    }

    #[test]
    fn try_new_rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 7;").unwrap();
        let err = SqliteKeyValueStore::try_new(&conn)
            .err()
            .expect("newer schema must be rejected");
        assert!(err.to_string().contains("is newer than supported"), "{err}");
    }
}
