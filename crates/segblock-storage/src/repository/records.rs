//! Keyed record repository.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{parse_datetime, Record};

/// Repository for keyed JSON records.
pub struct RecordRepo;

impl RecordRepo {
    /// Get a record by key.
    pub fn get(conn: &Connection, key: &str) -> Result<Option<Record>> {
        let row = conn
            .query_row(
                "SELECT key, value, updated_at FROM records WHERE key = ?1",
                [key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        // A value that no longer parses is a storage failure, not a missing record
        row.map(|(key, value, updated_at)| -> Result<Record> {
            Ok(Record {
                key,
                value: serde_json::from_str(&value)?,
                updated_at: parse_datetime(&updated_at),
            })
        })
        .transpose()
    }

    /// Set a record (insert or update).
    pub fn set(conn: &Connection, key: &str, value: &serde_json::Value) -> Result<()> {
        let value_json = serde_json::to_string(value)?;

        conn.execute(
            "INSERT INTO records (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value_json],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::schema::run_migrations;
    use serde_json::json;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_set_and_get() {
        let conn = setup_db();

        RecordRepo::set(&conn, "blockedSites", &json!([])).unwrap();
        let record = RecordRepo::get(&conn, "blockedSites").unwrap().unwrap();

        assert_eq!(record.key, "blockedSites");
        assert_eq!(record.value, json!([]));
    }

    #[test]
    fn test_update_existing() {
        let conn = setup_db();

        RecordRepo::set(&conn, "key", &json!(["a"])).unwrap();
        RecordRepo::set(&conn, "key", &json!(["a", "b"])).unwrap();

        let record = RecordRepo::get(&conn, "key").unwrap().unwrap();
        assert_eq!(record.value, json!(["a", "b"]));
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = setup_db();
        assert!(RecordRepo::get(&conn, "nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO records (key, value) VALUES ('broken', '{not json')",
            [],
        )
        .unwrap();

        let err = RecordRepo::get(&conn, "broken").unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }
}
