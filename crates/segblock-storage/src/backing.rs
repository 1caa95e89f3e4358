//! Where the rule list lives.
//!
//! [`RuleStore`](crate::RuleStore) only needs to load and save the whole
//! list, or to run one change as a single read-modify-write. Production
//! uses the SQLite [`Database`]; tests use [`MemoryBacking`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use segblock_core::BlockRule;

use crate::database::Database;
use crate::error::{Result, StorageError};

/// Persistence contract for the rule list.
pub trait RuleBacking {
    /// Read the full rule list.
    fn load(&self) -> Result<Vec<BlockRule>>;

    /// Replace the full rule list.
    fn save(&self, rules: &[BlockRule]) -> Result<()>;

    /// Load the list, let `apply` change it, and save it.
    ///
    /// Nothing is saved when `apply` fails. Backings shared between
    /// processes override this to hold a lock for the whole cycle.
    fn update<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<BlockRule>) -> Result<T>,
    {
        let mut rules = self.load()?;
        let output = apply(&mut rules)?;
        self.save(&rules)?;
        Ok(output)
    }
}

impl RuleBacking for Database {
    fn load(&self) -> Result<Vec<BlockRule>> {
        self.load_rules()
    }

    fn save(&self, rules: &[BlockRule]) -> Result<()> {
        self.save_rules(rules)
    }

    fn update<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<BlockRule>) -> Result<T>,
    {
        self.update_rules(apply)
    }
}

/// In-process backing, for tests.
///
/// Clones share the same list. Saves can be made to fail to simulate an
/// unavailable store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBacking {
    rules: Arc<Mutex<Vec<BlockRule>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryBacking {
    /// Creates an empty backing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backing pre-filled with rules.
    pub fn with_rules(rules: Vec<BlockRule>) -> Self {
        Self {
            rules: Arc::new(Mutex::new(rules)),
            fail_saves: Arc::default(),
        }
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl RuleBacking for MemoryBacking {
    fn load(&self) -> Result<Vec<BlockRule>> {
        let rules = self
            .rules
            .lock()
            .map_err(|_| StorageError::Unavailable("memory backing poisoned".into()))?;
        Ok(rules.clone())
    }

    fn save(&self, rules: &[BlockRule]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }

        let mut stored = self
            .rules
            .lock()
            .map_err(|_| StorageError::Unavailable("memory backing poisoned".into()))?;
        *stored = rules.to_vec();
        Ok(())
    }
}
