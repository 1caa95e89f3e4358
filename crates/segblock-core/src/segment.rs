//! Segment policy: how a day is split and how long a site may be unblocked.
//!
//! A day is divided into N equal segments. Only counts that divide 24 hours
//! evenly into at least two hours are allowed:
//!
//! | segments | segment duration |
//! |----------|------------------|
//! | 2        | 12h              |
//! | 4        | 6h               |
//! | 6        | 4h               |
//! | 8        | 3h               |
//! | 12       | 2h               |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Hours in a day.
pub const HOURS_PER_DAY: u32 = 24;

/// Smallest unblock window, in hours.
pub const MIN_UNBLOCK_HOURS: u32 = 1;

/// Number of equal segments a day is divided into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SegmentCount {
    Two,
    #[default]
    Four,
    Six,
    Eight,
    Twelve,
}

impl SegmentCount {
    /// All allowed segment counts, ascending.
    pub const ALL: [SegmentCount; 5] = [
        SegmentCount::Two,
        SegmentCount::Four,
        SegmentCount::Six,
        SegmentCount::Eight,
        SegmentCount::Twelve,
    ];

    /// Number of segments per day.
    pub fn count(self) -> u32 {
        match self {
            SegmentCount::Two => 2,
            SegmentCount::Four => 4,
            SegmentCount::Six => 6,
            SegmentCount::Eight => 8,
            SegmentCount::Twelve => 12,
        }
    }

    /// Length of one segment in hours.
    pub fn duration_hours(self) -> u32 {
        match self {
            SegmentCount::Two => 12,
            SegmentCount::Four => 6,
            SegmentCount::Six => 4,
            SegmentCount::Eight => 3,
            SegmentCount::Twelve => 2,
        }
    }

    /// Largest unblock window allowed per segment.
    pub fn max_unblock_hours(self) -> u32 {
        self.duration_hours()
    }

    /// Clamps an unblock window into `[1, max_unblock_hours]`.
    pub fn clamp_unblock_hours(self, hours: u32) -> u32 {
        hours.clamp(MIN_UNBLOCK_HOURS, self.max_unblock_hours())
    }

    /// Parses a segment count from its integer value.
    pub fn from_count(count: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.count() == count)
    }
}

impl TryFrom<u32> for SegmentCount {
    type Error = RuleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_count(value).ok_or(RuleError::InvalidSegments(value))
    }
}

impl From<SegmentCount> for u32 {
    fn from(value: SegmentCount) -> Self {
        value.count()
    }
}

impl fmt::Display for SegmentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_cover_the_whole_day() {
        for segments in SegmentCount::ALL {
            assert_eq!(
                segments.count() * segments.duration_hours(),
                HOURS_PER_DAY,
                "segments: {segments}"
            );
        }
    }

    #[test]
    fn duration_table() {
        let table: Vec<(u32, u32)> = SegmentCount::ALL
            .iter()
            .map(|s| (s.count(), s.duration_hours()))
            .collect();
        assert_eq!(table, vec![(2, 12), (4, 6), (6, 4), (8, 3), (12, 2)]);
    }

    #[test]
    fn from_count_accepts_only_allowed_values() {
        assert_eq!(SegmentCount::from_count(8), Some(SegmentCount::Eight));
        for invalid in [0, 1, 3, 5, 7, 10, 24] {
            assert_eq!(SegmentCount::from_count(invalid), None);
        }
        assert_eq!(
            SegmentCount::try_from(5),
            Err(RuleError::InvalidSegments(5))
        );
    }

    #[test]
    fn clamp_stays_within_bounds() {
        for segments in SegmentCount::ALL {
            for value in 1..=30 {
                let clamped = segments.clamp_unblock_hours(value);
                assert!(clamped >= MIN_UNBLOCK_HOURS);
                assert!(clamped <= segments.max_unblock_hours());
            }
        }
    }

    #[test]
    fn clamp_is_monotonic() {
        for segments in SegmentCount::ALL {
            let mut previous = 0;
            for value in 1..=30 {
                let clamped = segments.clamp_unblock_hours(value);
                assert!(clamped >= previous);
                previous = clamped;
            }
        }
    }

    #[test]
    fn clamp_keeps_values_in_range() {
        assert_eq!(SegmentCount::Four.clamp_unblock_hours(2), 2);
        assert_eq!(SegmentCount::Eight.clamp_unblock_hours(5), 3);
        assert_eq!(SegmentCount::Twelve.clamp_unblock_hours(0), 1);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&SegmentCount::Six).unwrap(), "6");
        let parsed: SegmentCount = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, SegmentCount::Twelve);
        assert!(serde_json::from_str::<SegmentCount>("5").is_err());
    }
}
