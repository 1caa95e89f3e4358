//! Rule updates for the enforcement component.
//!
//! After every successful store mutation the full rule list is broadcast as
//! `{"action": "updateBlockRules", "sites": [...]}`. Delivery is best effort:
//! a failed notification never undoes the store change, it is reported back
//! to the caller as a warning.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SyncError;
use crate::rule::BlockRule;

/// Message sent to the enforcement component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuleMessage {
    /// The complete, current rule list.
    UpdateBlockRules {
        /// All stored rules, in store order.
        sites: Vec<BlockRule>,
    },
}

impl RuleMessage {
    /// Builds an update message from the current rules.
    pub fn update(rules: &[BlockRule]) -> Self {
        RuleMessage::UpdateBlockRules {
            sites: rules.to_vec(),
        }
    }

    /// Rules carried by the message.
    pub fn sites(&self) -> &[BlockRule] {
        match self {
            RuleMessage::UpdateBlockRules { sites } => sites,
        }
    }
}

/// Outbound channel to the enforcement component.
pub trait RuleSync {
    /// Delivers the full rule list.
    fn notify(&self, rules: &[BlockRule]) -> Result<(), SyncError>;
}

/// Discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSync;

impl RuleSync for NoopSync {
    fn notify(&self, rules: &[BlockRule]) -> Result<(), SyncError> {
        trace!("Dropping rule update ({} rules)", rules.len());
        Ok(())
    }
}

/// Sends updates over an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelSync {
    tx: Sender<RuleMessage>,
}

impl ChannelSync {
    /// Creates a sync and the receiver the enforcement side listens on.
    pub fn new() -> (Self, Receiver<RuleMessage>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl RuleSync for ChannelSync {
    fn notify(&self, rules: &[BlockRule]) -> Result<(), SyncError> {
        self.tx
            .send(RuleMessage::update(rules))
            .map_err(|_| SyncError::NoListener)?;
        debug!("Sent rule update ({} rules)", rules.len());
        Ok(())
    }
}

/// Writes each update as JSON to a file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileSync {
    path: PathBuf,
}

impl FileSync {
    /// Creates a sync writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the updates are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSync for FileSync {
    fn notify(&self, rules: &[BlockRule]) -> Result<(), SyncError> {
        let body = serde_json::to_vec_pretty(&RuleMessage::update(rules))?;

        let mut file = AtomicWriteFile::options().open(&self.path)?;
        file.write_all(&body)?;
        file.commit()?;

        debug!("Wrote rule update ({} rules) to {:?}", rules.len(), self.path);
        Ok(())
    }
}

impl<T: RuleSync + ?Sized> RuleSync for Box<T> {
    fn notify(&self, rules: &[BlockRule]) -> Result<(), SyncError> {
        (**self).notify(rules)
    }
}
