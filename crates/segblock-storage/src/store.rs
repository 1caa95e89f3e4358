//! Persisted block rule collection.
//!
//! Every operation reloads the whole list from the backing, applies one
//! change and writes the whole list back. Nothing is cached between calls,
//! so each call sees what the previous one (or another process) saved.
//!
//! Rules are unique by normalized host: [`RuleStore::upsert`] replaces an
//! existing rule in place and only appends rules for new hosts.

use segblock_core::{BlockRule, Host};
use tracing::{debug, info};

use crate::backing::RuleBacking;
use crate::error::{Result, StorageError};

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// A rule for a new host was appended at `index`.
    Inserted { index: usize },
    /// The rule at `index` was replaced by one for the same host.
    Replaced { index: usize, previous: BlockRule },
    /// The rule at `index` was removed.
    Deleted { index: usize, removed: BlockRule },
}

/// Result of a successful mutation: what changed and the list as saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// What happened.
    pub kind: ChangeKind,
    /// Full rule list after the change, in store order.
    pub rules: Vec<BlockRule>,
}

/// Block rule repository over a [`RuleBacking`].
#[derive(Debug, Clone)]
pub struct RuleStore<B> {
    backing: B,
}

impl<B: RuleBacking> RuleStore<B> {
    /// Creates a store over the given backing.
    pub fn new(backing: B) -> Self {
        Self { backing }
    }

    /// All rules, in store order.
    pub fn list(&self) -> Result<Vec<BlockRule>> {
        self.backing.load()
    }

    /// The rule for `host`, if any.
    pub fn get(&self, host: &Host) -> Result<Option<BlockRule>> {
        Ok(self
            .backing
            .load()?
            .into_iter()
            .find(|rule| rule.url().matches(host)))
    }

    /// Inserts a rule, or replaces the rule for the same host in place.
    pub fn upsert(&self, rule: BlockRule) -> Result<StoreChange> {
        let change = self.backing.update(|rules| {
            let kind = match rules.iter().position(|r| r.url().matches(rule.url())) {
                Some(index) => {
                    let previous = std::mem::replace(&mut rules[index], rule);
                    ChangeKind::Replaced { index, previous }
                }
                None => {
                    rules.push(rule);
                    ChangeKind::Inserted {
                        index: rules.len() - 1,
                    }
                }
            };
            Ok(StoreChange {
                kind,
                rules: rules.clone(),
            })
        })?;

        match &change.kind {
            ChangeKind::Replaced { index, previous } => {
                info!("Replaced block rule for {} at {}", previous.url(), index)
            }
            ChangeKind::Inserted { index } => {
                info!("Added block rule for {} at {}", change.rules[*index].url(), index)
            }
            ChangeKind::Deleted { .. } => {}
        }

        Ok(change)
    }

    /// Removes the rule at `index`.
    ///
    /// An index past the end is `NotFound` and leaves the store untouched.
    pub fn delete(&self, index: usize) -> Result<StoreChange> {
        let change = self.backing.update(|rules| {
            if index >= rules.len() {
                debug!("Delete index {} out of range ({} rules)", index, rules.len());
                return Err(StorageError::NotFound(format!(
                    "no block rule at index {} ({} rules)",
                    index,
                    rules.len()
                )));
            }

            let removed = rules.remove(index);
            Ok(StoreChange {
                kind: ChangeKind::Deleted { index, removed },
                rules: rules.clone(),
            })
        })?;

        if let ChangeKind::Deleted { index, removed } = &change.kind {
            info!("Deleted block rule for {} at {}", removed.url(), index);
        }
        Ok(change)
    }

    /// Removes the rule for `host`.
    pub fn delete_host(&self, host: &Host) -> Result<StoreChange> {
        let change = self.backing.update(|rules| {
            let index = rules
                .iter()
                .position(|r| r.url().matches(host))
                .ok_or_else(|| StorageError::NotFound(format!("no block rule for {}", host)))?;

            let removed = rules.remove(index);
            Ok(StoreChange {
                kind: ChangeKind::Deleted { index, removed },
                rules: rules.clone(),
            })
        })?;

        info!("Deleted block rule for {}", host);
        Ok(change)
    }

    /// Removes every rule.
    ///
    /// The stored list is overwritten without being read, so this also
    /// recovers a store whose list no longer loads.
    pub fn clear(&self) -> Result<()> {
        self.backing.save(&[])?;
        info!("Cleared all block rules");
        Ok(())
    }
}
