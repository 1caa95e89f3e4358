//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use rusqlite::{Connection, TransactionBehavior};
use segblock_core::{BlockRule, Host};
use serde::de::Error as _;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::BLOCKED_SITES_KEY;
use crate::pool::ConnectionPool;
use crate::repository::RecordRepo;

/// File name of the database inside the data directory.
const DB_FILE_NAME: &str = "segblock.db";

/// SQLite-backed key-value store for Segblock.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "segblock", "segblock")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join(DB_FILE_NAME))
    }

    // === Block rules ===

    /// Load the persisted rule list. A missing record is an empty list.
    pub fn load_rules(&self) -> Result<Vec<BlockRule>> {
        let conn = self.pool.get()?;
        read_rules(&conn)
    }

    /// Replace the persisted rule list.
    pub fn save_rules(&self, rules: &[BlockRule]) -> Result<()> {
        let conn = self.pool.get()?;
        write_rules(&conn, rules)
    }

    /// Load, change and save the rule list in one immediate transaction.
    ///
    /// Other connections wait on the write lock for the whole cycle, so
    /// concurrent updates never overwrite each other. Nothing is written
    /// when `apply` fails.
    pub fn update_rules<T>(
        &self,
        apply: impl FnOnce(&mut Vec<BlockRule>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut rules = read_rules(&tx)?;
        let output = apply(&mut rules)?;
        write_rules(&tx, &rules)?;

        tx.commit()?;
        Ok(output)
    }
}

#[cfg(test)]
impl Database {
    /// Writes a `blockedSites` value without validating it.
    pub(crate) fn seed_raw_rules(&self, value: &serde_json::Value) {
        let conn = self.pool.get().unwrap();
        RecordRepo::set(&conn, BLOCKED_SITES_KEY, value).unwrap();
    }

    /// Reads the `blockedSites` value without validating it.
    pub(crate) fn raw_rules(&self) -> serde_json::Value {
        let conn = self.pool.get().unwrap();
        RecordRepo::get(&conn, BLOCKED_SITES_KEY)
            .unwrap()
            .map(|record| record.value)
            .unwrap_or_default()
    }
}

fn read_rules(conn: &Connection) -> Result<Vec<BlockRule>> {
    let rules: Vec<BlockRule> = match RecordRepo::get(conn, BLOCKED_SITES_KEY)? {
        Some(record) => serde_json::from_value(record.value)?,
        None => return Ok(Vec::new()),
    };

    if let Some(host) = duplicate_host(&rules) {
        return Err(StorageError::Json(serde_json::Error::custom(format!(
            "duplicate block rule for {}",
            host
        ))));
    }

    debug!("Loaded {} block rules", rules.len());
    Ok(rules)
}

fn write_rules(conn: &Connection, rules: &[BlockRule]) -> Result<()> {
    let value = serde_json::to_value(rules)?;
    RecordRepo::set(conn, BLOCKED_SITES_KEY, &value)?;
    debug!("Saved {} block rules", rules.len());
    Ok(())
}

/// First host that appears more than once, ignoring case.
fn duplicate_host(rules: &[BlockRule]) -> Option<&Host> {
    rules.iter().enumerate().find_map(|(i, rule)| {
        rules[..i]
            .iter()
            .any(|earlier| earlier.url().matches(rule.url()))
            .then(|| rule.url())
    })
}
