//! Data models for storage.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record key holding the ordered block rule list.
pub const BLOCKED_SITES_KEY: &str = "blockedSites";

/// A keyed JSON record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Record key.
    pub key: String,
    /// Stored JSON value.
    pub value: serde_json::Value,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

/// Parse a SQLite `datetime('now')` timestamp.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}
