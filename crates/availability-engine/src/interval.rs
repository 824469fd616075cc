//! Half-open time intervals and the single overlap primitive.
//!
//! Every overlap decision in this crate (conflict checks, busy collection,
//! merging, gap sizing) goes through [`TimeInterval::overlaps`]. Intervals are
//! `[start, end)`, so back-to-back meetings never overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A non-empty half-open range `[start, end)` of absolute instants.
///
/// The `start < end` invariant is enforced at construction, including when
/// deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create an interval.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval whose ordering the caller has already established.
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "interval {start}..{end} is empty or inverted");
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Two half-open intervals `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
    ///
    /// Symmetric. Adjacent intervals (`b == c`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part of two intervals, or `None` when they do not overlap.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Length of the shared part of two intervals; zero when disjoint.
    pub fn intersection_length(&self, other: &TimeInterval) -> Duration {
        self.intersection(other)
            .map(|i| i.duration())
            .unwrap_or_else(Duration::zero)
    }

    /// Clip this interval to `window`. `None` if nothing of it lies inside.
    pub fn clip_to(&self, window: &TimeInterval) -> Option<TimeInterval> {
        self.intersection(window)
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains_interval(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
