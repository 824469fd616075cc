//! First-fit free slot search over merged busy blocks.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::event::UserId;
use crate::interval::TimeInterval;

/// A validated availability search.
///
/// Deserializes from
/// `{"search_window": {"start": .., "end": ..}, "slot_duration_minutes": 30,
/// "max_slots": 5, "participant_ids": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawQuery")]
pub struct AvailabilityQuery {
    search_window: TimeInterval,
    slot_duration: Duration,
    max_slots: NonZeroUsize,
    participant_ids: BTreeSet<UserId>,
}

#[derive(Deserialize)]
struct RawQuery {
    search_window: TimeInterval,
    slot_duration_minutes: i64,
    max_slots: usize,
    #[serde(default)]
    participant_ids: BTreeSet<UserId>,
}

impl TryFrom<RawQuery> for AvailabilityQuery {
    type Error = EngineError;

    fn try_from(raw: RawQuery) -> Result<Self> {
        let seconds = raw.slot_duration_minutes.saturating_mul(60);
        let slot_duration = Duration::try_minutes(raw.slot_duration_minutes)
            .ok_or(EngineError::InvalidSlotDuration(seconds))?;
        AvailabilityQuery::new(
            raw.search_window,
            slot_duration,
            raw.max_slots,
            raw.participant_ids,
        )
    }
}

impl AvailabilityQuery {
    /// # Errors
    /// - `EngineError::InvalidSlotDuration` if `slot_duration` is zero or negative.
    /// - `EngineError::InvalidSlotCount` if `max_slots` is zero.
    pub fn new(
        search_window: TimeInterval,
        slot_duration: Duration,
        max_slots: usize,
        participant_ids: BTreeSet<UserId>,
    ) -> Result<Self> {
        if slot_duration <= Duration::zero() {
            return Err(EngineError::InvalidSlotDuration(slot_duration.num_seconds()));
        }
        let max_slots = NonZeroUsize::new(max_slots).ok_or(EngineError::InvalidSlotCount(0))?;
        Ok(Self {
            search_window,
            slot_duration,
            max_slots,
            participant_ids,
        })
    }

    pub fn search_window(&self) -> &TimeInterval {
        &self.search_window
    }

    pub fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots.get()
    }

    pub fn participant_ids(&self) -> &BTreeSet<UserId> {
        &self.participant_ids
    }
}

/// A free span long enough for the requested meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl From<TimeInterval> for TimeSlot {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
            duration_minutes: interval.duration_minutes(),
        }
    }
}

/// Find up to `query.max_slots()` free slots, earliest first.
///
/// `merged_busy` must be sorted and disjoint (the output of
/// [`merge_intervals`](crate::merge::merge_intervals)); blocks may extend past
/// the window. Each returned slot is a whole free gap: at least
/// `slot_duration` long and inside the search window. The search stops as soon
/// as the quota is filled, so later and possibly longer gaps are never
/// considered.
///
/// With no participants the whole window is one slot when it is long enough.
pub fn find_slots(merged_busy: &[TimeInterval], query: &AvailabilityQuery) -> Vec<TimeSlot> {
    debug_assert!(
        merged_busy.windows(2).all(|w| w[0].end() <= w[1].start()),
        "busy blocks must be sorted and disjoint"
    );

    let window = query.search_window();
    let fits = |gap: &TimeInterval| gap.duration() >= query.slot_duration();

    if query.participant_ids().is_empty() {
        return if fits(window) {
            vec![TimeSlot::from(*window)]
        } else {
            Vec::new()
        };
    }

    let mut slots = Vec::new();
    let mut cursor = window.start();

    for busy in merged_busy {
        if let Some(gap) = free_gap(cursor, busy.start(), window) {
            if fits(&gap) {
                slots.push(TimeSlot::from(gap));
                if slots.len() == query.max_slots() {
                    return slots;
                }
            }
        }
        cursor = cursor.max(busy.end());
    }

    if let Some(gap) = free_gap(cursor, window.end(), window) {
        if fits(&gap) {
            slots.push(TimeSlot::from(gap));
        }
    }

    slots
}

/// The part of `[from, to)` inside `window`, if non-empty.
fn free_gap(from: DateTime<Utc>, to: DateTime<Utc>, window: &TimeInterval) -> Option<TimeInterval> {
    TimeInterval::new(from, to).ok()?.clip_to(window)
}
