//! Segblock - block websites except for a few hours in every segment of the day.
//!
//! This crate holds the application layer shared by presentation adapters:
//!
//! - [`BlockRuleService`]: save/delete flows (normalize, persist, notify)
//! - [`Notice`]: the user-facing message for each outcome
//! - [`ServiceError`]: `InvalidUrl`, `InvalidRule`, `Persistence` and `NotFound`
//!
//! # Usage
//!
//! ```no_run
//! use segblock_app::{BlockRuleService, Notice};
//! use segblock_core::{FileSync, RuleDraft, SegmentCount};
//! use segblock_storage::{Database, RuleStore};
//!
//! let db = Database::new().expect("Failed to open database");
//! let service = BlockRuleService::new(RuleStore::new(db), FileSync::new("rules.json"));
//!
//! let mut draft = RuleDraft::new();
//! draft.set_url("youtube.com");
//! draft.select_segments(SegmentCount::Eight);
//!
//! let result = service.save(&draft);
//! println!("{}", Notice::for_save(&result));
//! ```

pub mod error;
pub mod notice;
pub mod service;

pub use error::{Result, ServiceError};
pub use notice::{Notice, NoticeKind};
pub use service::{Applied, BlockRuleService};
