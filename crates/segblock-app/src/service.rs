//! Save and delete flows for block rules.
//!
//! Each action runs to completion: normalize the input, build the rule,
//! persist it through the [`RuleStore`], then push the new list to the
//! enforcement component. A failed push is reported as a warning on the
//! returned [`Applied`] and never undoes the store change. Failed
//! validation or persistence sends nothing.

use segblock_core::{now_millis, BlockRule, Host, RuleDraft, RuleSync, SyncError};
use segblock_storage::{ChangeKind, RuleBacking, RuleStore, StoreChange};
use tracing::{info, warn};

use crate::error::Result;

/// A mutation that was persisted.
#[derive(Debug)]
pub struct Applied {
    /// What the store did.
    pub change: StoreChange,
    /// Set if the enforcement component could not be notified.
    pub sync_warning: Option<SyncError>,
}

impl Applied {
    /// True if the saved rule replaced an existing one.
    pub fn replaced(&self) -> bool {
        matches!(self.change.kind, ChangeKind::Replaced { .. })
    }

    /// The rule affected by the change (saved or removed).
    pub fn rule(&self) -> &BlockRule {
        match &self.change.kind {
            ChangeKind::Inserted { index } | ChangeKind::Replaced { index, .. } => {
                &self.change.rules[*index]
            }
            ChangeKind::Deleted { removed, .. } => removed,
        }
    }
}

/// Block rule use cases over an injected store and sync sink.
pub struct BlockRuleService<B, S> {
    store: RuleStore<B>,
    sync: S,
}

impl<B: RuleBacking, S: RuleSync> BlockRuleService<B, S> {
    /// Creates a service.
    pub fn new(store: RuleStore<B>, sync: S) -> Self {
        Self { store, sync }
    }

    /// All rules, in store order.
    pub fn list(&self) -> Result<Vec<BlockRule>> {
        Ok(self.store.list()?)
    }

    /// A draft for `raw`, pre-filled from the saved rule for the same host.
    ///
    /// Unknown hosts and input that is not a URL get the default selection;
    /// saving the draft reports bad input.
    pub fn draft_for(&self, raw: &str) -> Result<RuleDraft> {
        let existing = match Host::parse(raw) {
            Ok(host) => self.store.get(&host)?,
            Err(_) => None,
        };

        let mut draft = existing
            .map(|rule| RuleDraft::from_rule(&rule))
            .unwrap_or_default();
        draft.set_url(raw);
        Ok(draft)
    }

    /// Builds a rule from the draft, stamped now, and saves it.
    pub fn save(&self, draft: &RuleDraft) -> Result<Applied> {
        self.save_at(draft, now_millis())
    }

    /// Builds a rule from the draft, stamped `now_ms`, and saves it.
    pub fn save_at(&self, draft: &RuleDraft, now_ms: i64) -> Result<Applied> {
        let rule = draft.build(now_ms)?;
        info!(
            "Saving block rule for {} ({} segments, {}h unblock)",
            rule.url(),
            rule.segments(),
            rule.unblock_hours()
        );

        let change = self.store.upsert(rule)?;
        Ok(self.publish(change))
    }

    /// Deletes the rule at `index` of the current list.
    pub fn delete(&self, index: usize) -> Result<Applied> {
        let change = self.store.delete(index)?;
        Ok(self.publish(change))
    }

    /// Deletes the rule for a host given as raw user input.
    pub fn delete_host(&self, raw: &str) -> Result<Applied> {
        let host = Host::parse(raw)?;
        let change = self.store.delete_host(&host)?;
        Ok(self.publish(change))
    }

    /// Deletes every rule, even when the stored list no longer loads.
    ///
    /// Returns the sync warning, if any.
    pub fn clear(&self) -> Result<Option<SyncError>> {
        self.store.clear()?;
        Ok(self.notify(&[]))
    }

    fn publish(&self, change: StoreChange) -> Applied {
        let sync_warning = self.notify(&change.rules);
        Applied {
            change,
            sync_warning,
        }
    }

    fn notify(&self, rules: &[BlockRule]) -> Option<SyncError> {
        match self.sync.notify(rules) {
            Ok(()) => None,
            Err(e) => {
                warn!("Rule update not delivered: {}", e);
                Some(e)
            }
        }
    }
}
