//! Segblock Storage - SQLite persistence layer.
//!
//! The block rule list is persisted as one JSON record, `blockedSites`, in a
//! small key-value table. On top of that this crate provides:
//!
//! - [`RuleBacking`]: the load/save contract, implemented by [`Database`]
//!   and by [`MemoryBacking`] for tests
//! - [`RuleStore`]: list/upsert/delete with one rule per normalized host;
//!   each change is one read-modify-write of the record
//!
//! # Example
//!
//! ```no_run
//! use segblock_core::{BlockRule, Host, SegmentCount};
//! use segblock_storage::{Database, RuleStore};
//!
//! let store = RuleStore::new(Database::in_memory().unwrap());
//!
//! let rule = BlockRule::new(Host::parse("example.com").unwrap(), SegmentCount::Eight, 2, 0);
//! store.upsert(rule).unwrap();
//!
//! assert_eq!(store.list().unwrap().len(), 1);
//! ```

mod backing;
mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;
mod store;

pub use backing::{MemoryBacking, RuleBacking};
pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{Record, BLOCKED_SITES_KEY};
pub use store::{ChangeKind, RuleStore, StoreChange};
