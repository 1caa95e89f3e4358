//! Segblock Core - block rules, segment policy and URL normalization.
//!
//! A block rule keeps a website blocked except for a few hours within each
//! of N equal segments of the day. This crate provides:
//!
//! - [`host`]: normalization of user input into a bare hostname key
//! - [`segment`]: the allowed segment counts and the unblock-hours clamp
//! - [`rule`]: the [`BlockRule`] entity and its invariants
//! - [`draft`]: form state shared by presentation adapters
//! - [`sync`]: the `updateBlockRules` message and its delivery sinks
//!
//! # Example
//!
//! ```
//! use segblock_core::{RuleDraft, SegmentCount};
//!
//! let mut draft = RuleDraft::new();
//! draft.set_url("https://www.Example.com/feed");
//! draft.set_unblock_hours(5);
//! draft.select_segments(SegmentCount::Eight);
//!
//! let rule = draft.build(0).unwrap();
//! assert_eq!(rule.url().as_str(), "example.com");
//! assert_eq!(rule.unblock_hours(), 3);
//! ```

pub mod draft;
pub mod error;
pub mod host;
pub mod rule;
pub mod segment;
pub mod sync;

pub use draft::{RuleDraft, DEFAULT_UNBLOCK_HOURS};
pub use error::{Result, RuleError, SyncError};
pub use host::{normalize, Host};
pub use rule::{now_millis, BlockRule};
pub use segment::{SegmentCount, HOURS_PER_DAY, MIN_UNBLOCK_HOURS};
pub use sync::{ChannelSync, FileSync, NoopSync, RuleMessage, RuleSync};
