//! Block rules.
//!
//! A [`BlockRule`] keeps a site blocked except for `unblock_hours` within
//! every segment of the day. The rule is keyed by its normalized
//! host, and its fields always satisfy:
//!
//! - `url` is a host [`normalize`](crate::normalize) can produce
//! - `segment_duration == 24 / segments`
//! - `1 <= unblock_hours <= segment_duration`
//!
//! All three hold for rules built in code and for rules loaded from storage;
//! deserialization rejects records that break them.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::host::Host;
use crate::segment::{SegmentCount, MIN_UNBLOCK_HOURS};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A user-configured block rule for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBlockRule")]
pub struct BlockRule {
    url: Host,
    segments: SegmentCount,
    unblock_hours: u32,
    segment_duration: u32,
    created_at: i64,
}

impl BlockRule {
    /// Creates a rule, clamping `unblock_hours` to the segment duration.
    pub fn new(url: Host, segments: SegmentCount, unblock_hours: u32, created_at: i64) -> Self {
        Self {
            url,
            segments,
            unblock_hours: segments.clamp_unblock_hours(unblock_hours),
            segment_duration: segments.duration_hours(),
            created_at,
        }
    }

    /// Normalized host this rule applies to.
    pub fn url(&self) -> &Host {
        &self.url
    }

    /// Number of segments per day.
    pub fn segments(&self) -> SegmentCount {
        self.segments
    }

    /// Hours of access granted per segment.
    pub fn unblock_hours(&self) -> u32 {
        self.unblock_hours
    }

    /// Length of one segment in hours.
    pub fn segment_duration(&self) -> u32 {
        self.segment_duration
    }

    /// Timestamp of the last save, in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl fmt::Display for BlockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} — {} segments • {}h unblock per segment",
            self.url, self.segments, self.unblock_hours
        )
    }
}

/// Wire shape of a rule before its invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlockRule {
    url: Host,
    segments: u32,
    unblock_hours: u32,
    segment_duration: u32,
    created_at: i64,
}

impl TryFrom<RawBlockRule> for BlockRule {
    type Error = RuleError;

    fn try_from(raw: RawBlockRule) -> Result<Self, Self::Error> {
        let invalid = |reason: String| RuleError::InvalidRule {
            url: raw.url.to_string(),
            reason,
        };

        if !raw.url.is_normalized() {
            return Err(invalid("url is not a normalized host".to_string()));
        }

        let segments = SegmentCount::try_from(raw.segments)?;

        if raw.segment_duration != segments.duration_hours() {
            return Err(invalid(format!(
                "segment duration {}h does not match {} segments",
                raw.segment_duration, segments
            )));
        }

        if raw.unblock_hours < MIN_UNBLOCK_HOURS || raw.unblock_hours > raw.segment_duration {
            return Err(invalid(format!(
                "unblock hours {} outside 1..={}",
                raw.unblock_hours, raw.segment_duration
            )));
        }

        Ok(Self {
            url: raw.url,
            segments,
            unblock_hours: raw.unblock_hours,
            segment_duration: raw.segment_duration,
            created_at: raw.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host(raw: &str) -> Host {
        Host::parse(raw).unwrap()
    }

    #[test]
    fn new_derives_duration_and_clamps() {
        let rule = BlockRule::new(host("example.com"), SegmentCount::Eight, 5, 1_000);

        assert_eq!(rule.url().as_str(), "example.com");
        assert_eq!(rule.segments(), SegmentCount::Eight);
        assert_eq!(rule.segment_duration(), 3);
        assert_eq!(rule.unblock_hours(), 3);
        assert_eq!(rule.created_at(), 1_000);
    }

    #[test]
    fn zero_hours_are_raised_to_one() {
        let rule = BlockRule::new(host("example.com"), SegmentCount::Two, 0, 0);
        assert_eq!(rule.unblock_hours(), 1);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let rule = BlockRule::new(host("example.com"), SegmentCount::Four, 2, 1_700_000_000_000);
        let value = serde_json::to_value(&rule).unwrap();

        assert_eq!(
            value,
            json!({
                "url": "example.com",
                "segments": 4,
                "unblockHours": 2,
                "segmentDuration": 6,
                "createdAt": 1_700_000_000_000_i64
            })
        );

        let back: BlockRule = serde_json::from_value(value).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn deserialize_rejects_unknown_segments() {
        let value = json!({
            "url": "example.com",
            "segments": 5,
            "unblockHours": 2,
            "segmentDuration": 4,
            "createdAt": 0
        });
        assert!(serde_json::from_value::<BlockRule>(value).is_err());
    }

    #[test]
    fn deserialize_rejects_mismatched_duration() {
        let value = json!({
            "url": "example.com",
            "segments": 4,
            "unblockHours": 2,
            "segmentDuration": 12,
            "createdAt": 0
        });
        assert!(serde_json::from_value::<BlockRule>(value).is_err());
    }

    #[test]
    fn deserialize_rejects_hours_out_of_range() {
        let too_many = json!({
            "url": "example.com",
            "segments": 8,
            "unblockHours": 5,
            "segmentDuration": 3,
            "createdAt": 0
        });
        let zero = json!({
            "url": "example.com",
            "segments": 8,
            "unblockHours": 0,
            "segmentDuration": 3,
            "createdAt": 0
        });

        assert!(serde_json::from_value::<BlockRule>(too_many).is_err());
        assert!(serde_json::from_value::<BlockRule>(zero).is_err());
    }

    #[test]
    fn deserialize_rejects_unnormalized_url() {
        for url in ["https://Example.com/path", "Example.com", "example.com:443"] {
            let value = json!({
                "url": url,
                "segments": 4,
                "unblockHours": 2,
                "segmentDuration": 6,
                "createdAt": 0
            });
            let err = serde_json::from_value::<BlockRule>(value).unwrap_err();
            assert!(err.to_string().contains("not a normalized host"), "{url}: {err}");
        }
    }

    #[test]
    fn display_matches_listing_text() {
        let rule = BlockRule::new(host("example.com"), SegmentCount::Six, 3, 0);
        assert_eq!(
            rule.to_string(),
            "example.com — 6 segments • 3h unblock per segment"
        );
    }

    #[test]
    fn now_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
