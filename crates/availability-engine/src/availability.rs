//! Multi-participant availability: the slot search pipeline and a free/busy view.
//!
//! [`find_available_slots`] chains collection, merging, clipping and the
//! first-fit search. [`free_busy`] exposes the merged busy blocks and every free
//! gap of a window, optionally with how many of the queried participants are
//! busy in each block.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collector::{collect_busy_by_participant, collect_busy_intervals};
use crate::event::{CalendarEvent, UserId};
use crate::interval::TimeInterval;
use crate::merge::{clip_all, merge_intervals};
use crate::slots::{find_slots, AvailabilityQuery, TimeSlot};

/// Find free slots for every participant of `query` among `events`.
pub fn find_available_slots(events: &[CalendarEvent], query: &AvailabilityQuery) -> Vec<TimeSlot> {
    let window = query.search_window();
    let busy = collect_busy_intervals(events, query.participant_ids(), window);
    let merged = clip_all(&merge_intervals(busy), window);
    let slots = find_slots(&merged, query);

    debug!(
        events = events.len(),
        participants = query.participant_ids().len(),
        busy_blocks = merged.len(),
        slots = slots.len(),
        "availability search complete"
    );

    slots
}

/// How much participant detail a free/busy view reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Busy blocks carry the number of busy participants.
    Full,
    /// Only busy/free ranges; `attendee_count` is 0 on every block.
    #[default]
    Opaque,
}

/// A merged busy block within the view window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Queried participants with at least one commitment overlapping this block.
    /// 0 under [`PrivacyLevel::Opaque`].
    pub attendee_count: usize,
}

/// Combined free/busy picture of a window for a group of participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyView {
    /// Sorted, disjoint, clipped to the window.
    pub busy: Vec<BusyBlock>,
    /// Every gap between busy blocks, regardless of length.
    pub free: Vec<TimeSlot>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub privacy: PrivacyLevel,
}

/// Compute the free/busy view of `window` for `participants`.
///
/// With no participants the whole window is free.
pub fn free_busy(
    events: &[CalendarEvent],
    participants: &BTreeSet<UserId>,
    window: &TimeInterval,
    privacy: PrivacyLevel,
) -> FreeBusyView {
    let by_user = collect_busy_by_participant(events, participants, window);
    let busy = collect_busy_intervals(events, participants, window);
    let merged = clip_all(&merge_intervals(busy), window);

    let blocks = merged
        .iter()
        .map(|block| {
            let attendee_count = match privacy {
                PrivacyLevel::Full => by_user
                    .values()
                    .filter(|intervals| intervals.iter().any(|i| i.overlaps(block)))
                    .count(),
                PrivacyLevel::Opaque => 0,
            };
            BusyBlock {
                start: block.start(),
                end: block.end(),
                attendee_count,
            }
        })
        .collect();

    FreeBusyView {
        busy: blocks,
        free: gaps(&merged, window),
        window_start: window.start(),
        window_end: window.end(),
        privacy,
    }
}

// `merged` is sorted, disjoint and inside `window`.
fn gaps(merged: &[TimeInterval], window: &TimeInterval) -> Vec<TimeSlot> {
    let mut free = Vec::new();
    let mut cursor = window.start();

    for block in merged {
        if cursor < block.start() {
            free.push(TimeSlot::from(TimeInterval::from_ordered(cursor, block.start())));
        }
        cursor = cursor.max(block.end());
    }
    if cursor < window.end() {
        free.push(TimeSlot::from(TimeInterval::from_ordered(cursor, window.end())));
    }

    free
}
