//! Editable form state for a block rule.
//!
//! Every presentation adapter (slider popup, CLI, ...) drives the same
//! [`RuleDraft`]. Selecting a new segment count re-clamps the chosen unblock
//! hours immediately, so the value an adapter shows is always the value that
//! gets saved.

use tracing::debug;

use crate::error::Result;
use crate::host::Host;
use crate::rule::BlockRule;
use crate::segment::{SegmentCount, MIN_UNBLOCK_HOURS};

/// Unblock hours selected when a draft is first opened.
pub const DEFAULT_UNBLOCK_HOURS: u32 = 2;

/// In-progress rule input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDraft {
    url: String,
    segments: SegmentCount,
    unblock_hours: u32,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            url: String::new(),
            segments: SegmentCount::default(),
            unblock_hours: DEFAULT_UNBLOCK_HOURS,
        }
    }
}

impl RuleDraft {
    /// Creates a draft with the default selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft pre-filled from an existing rule.
    pub fn from_rule(rule: &BlockRule) -> Self {
        Self {
            url: rule.url().to_string(),
            segments: rule.segments(),
            unblock_hours: rule.unblock_hours(),
        }
    }

    /// Sets the raw URL text.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Raw URL text as entered.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Currently selected segment count.
    pub fn segments(&self) -> SegmentCount {
        self.segments
    }

    /// Currently selected unblock hours.
    pub fn unblock_hours(&self) -> u32 {
        self.unblock_hours
    }

    /// Bounds of the unblock-hours selector for the current segment count.
    pub fn hours_range(&self) -> (u32, u32) {
        (MIN_UNBLOCK_HOURS, self.segments.max_unblock_hours())
    }

    /// Selects a segment count, re-clamping the unblock hours.
    ///
    /// Returns the unblock hours after clamping.
    pub fn select_segments(&mut self, segments: SegmentCount) -> u32 {
        self.segments = segments;
        let clamped = segments.clamp_unblock_hours(self.unblock_hours);
        if clamped != self.unblock_hours {
            debug!(
                "Unblock hours clamped from {} to {} for {} segments",
                self.unblock_hours, clamped, segments
            );
        }
        self.unblock_hours = clamped;
        clamped
    }

    /// Sets the unblock hours, clamped to the selector bounds.
    ///
    /// Returns the stored value.
    pub fn set_unblock_hours(&mut self, hours: u32) -> u32 {
        self.unblock_hours = self.segments.clamp_unblock_hours(hours);
        self.unblock_hours
    }

    /// Normalizes the URL and builds a rule stamped with `now_ms`.
    pub fn build(&self, now_ms: i64) -> Result<BlockRule> {
        let host = Host::parse(&self.url)?;
        Ok(BlockRule::new(
            host,
            self.segments,
            self.unblock_hours,
            now_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;

    #[test]
    fn defaults_match_initial_selection() {
        let draft = RuleDraft::new();
        assert_eq!(draft.segments(), SegmentCount::Four);
        assert_eq!(draft.unblock_hours(), 2);
        assert_eq!(draft.hours_range(), (1, 6));
        assert_eq!(draft.url(), "");
    }

    #[test]
    fn selecting_segments_reclamps_immediately() {
        let mut draft = RuleDraft::new();
        draft.select_segments(SegmentCount::Two);
        assert_eq!(draft.set_unblock_hours(10), 10);

        assert_eq!(draft.select_segments(SegmentCount::Eight), 3);
        assert_eq!(draft.unblock_hours(), 3);
        assert_eq!(draft.hours_range(), (1, 3));
    }

    #[test]
    fn narrowing_then_widening_does_not_restore_hours() {
        let mut draft = RuleDraft::new();
        draft.select_segments(SegmentCount::Two);
        draft.set_unblock_hours(10);

        assert_eq!(draft.select_segments(SegmentCount::Six), 4);
        assert_eq!(draft.select_segments(SegmentCount::Two), 4);
    }

    #[test]
    fn selecting_wider_segments_keeps_value() {
        let mut draft = RuleDraft::new();
        draft.set_unblock_hours(2);
        assert_eq!(draft.select_segments(SegmentCount::Two), 2);
    }

    #[test]
    fn set_unblock_hours_clamps() {
        let mut draft = RuleDraft::new();
        assert_eq!(draft.set_unblock_hours(0), 1);
        assert_eq!(draft.set_unblock_hours(99), 6);
    }

    #[test]
    fn displayed_value_equals_persisted_value() {
        let mut draft = RuleDraft::new();
        draft.set_url("example.com");
        draft.select_segments(SegmentCount::Eight);
        draft.set_unblock_hours(5);

        let shown = draft.unblock_hours();
        let rule = draft.build(42).unwrap();

        assert_eq!(shown, 3);
        assert_eq!(rule.unblock_hours(), shown);
        assert_eq!(rule.segment_duration(), 3);
        assert_eq!(rule.created_at(), 42);
    }

    #[test]
    fn build_normalizes_url() {
        let mut draft = RuleDraft::new();
        draft.set_url("https://www.YouTube.com/watch?v=1");
        let rule = draft.build(0).unwrap();
        assert_eq!(rule.url().as_str(), "youtube.com");
    }

    #[test]
    fn build_rejects_bad_url() {
        let draft = RuleDraft::new();
        assert_eq!(draft.build(0), Err(RuleError::EmptyUrl));

        let mut draft = RuleDraft::new();
        draft.set_url("http://exa mple.com");
        assert!(draft.build(0).unwrap_err().is_invalid_url());
    }

    #[test]
    fn from_rule_round_trips_selection() {
        let mut draft = RuleDraft::new();
        draft.set_url("example.com");
        draft.select_segments(SegmentCount::Six);
        draft.set_unblock_hours(3);
        let rule = draft.build(0).unwrap();

        let reopened = RuleDraft::from_rule(&rule);
        assert_eq!(reopened, draft);
    }
}
