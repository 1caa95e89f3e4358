//! Database connection pool.
//!
//! A single Mutex-protected connection. Rule operations are short
//! read-modify-write cycles on one row, so one connection is enough.

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{Result, StorageError};
use crate::schema::run_migrations;

/// How long to wait on a database locked by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Thread-safe, cloneable handle to the database connection.
#[derive(Clone)]
pub struct ConnectionPool {
    conn: Arc<Mutex<Connection>>,
}

impl ConnectionPool {
    /// Opens (or creates) a file-based database.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::setup_connection(&conn)?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup_connection(&conn)?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Borrows the connection.
    pub fn get(&self) -> Result<PooledConnection<'_>> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Config("Connection pool poisoned".to_string()))?;

        Ok(PooledConnection { guard })
    }

    fn setup_connection(conn: &Connection) -> Result<()> {
        // The enforcement component may read the same file concurrently
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(())
    }
}

/// A connection borrowed from the pool.
pub struct PooledConnection<'a> {
    guard: MutexGuard<'a, Connection>,
}

impl<'a> std::ops::Deref for PooledConnection<'a> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<'a> std::ops::DerefMut for PooledConnection<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_pool() {
        let pool = ConnectionPool::in_memory().unwrap();
        let conn = pool.get().unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_pool_clones_share_connection() {
        let pool1 = ConnectionPool::in_memory().unwrap();
        let pool2 = pool1.clone();

        pool1
            .get()
            .unwrap()
            .execute(
                "INSERT INTO records (key, value) VALUES ('k', '1')",
                [],
            )
            .unwrap();

        let count: i64 = pool2
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_file_pool_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::new(dir.path().join("rules.db")).unwrap();

        let version: i32 = pool
            .get()
            .unwrap()
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, crate::schema::SCHEMA_VERSION);
    }
}
