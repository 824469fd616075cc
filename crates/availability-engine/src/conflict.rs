//! Single-user conflict checks for the event creation and update paths.
//!
//! Only active events are commitments; a cancelled event never blocks a booking.
//! When updating an event, pass its id as `excluding` so the event cannot
//! conflict with its own previous time.

use serde::Serialize;

use crate::event::{CalendarEvent, EventId, UserId};
use crate::interval::TimeInterval;

/// An existing commitment that blocks a candidate interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub event_id: EventId,
    pub interval: TimeInterval,
    pub overlap_minutes: i64,
}

fn blocking<'a>(
    existing: &'a [CalendarEvent],
    candidate: &'a TimeInterval,
    excluding: Option<&'a EventId>,
) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
    existing
        .iter()
        .filter(|e| e.is_active())
        .filter(move |e| excluding != Some(&e.id))
        .filter(move |e| e.interval.overlaps(candidate))
}

/// Whether `candidate` overlaps any active event in `existing`.
///
/// The caller must have validated the candidate; [`TimeInterval`] guarantees
/// `start < end` by construction.
pub fn has_conflict(
    existing: &[CalendarEvent],
    candidate: &TimeInterval,
    excluding: Option<&EventId>,
) -> bool {
    blocking(existing, candidate, excluding).next().is_some()
}

/// Every active event in `existing` that overlaps `candidate`, in input order.
///
/// Adjacent events (one ends exactly when the other starts) are not conflicts.
pub fn find_conflicts(
    existing: &[CalendarEvent],
    candidate: &TimeInterval,
    excluding: Option<&EventId>,
) -> Vec<Conflict> {
    blocking(existing, candidate, excluding)
        .map(|e| Conflict {
            event_id: e.id.clone(),
            interval: e.interval,
            overlap_minutes: e.interval.intersection_length(candidate).num_minutes(),
        })
        .collect()
}

/// The active events `user` created or participates in.
pub fn commitments_for<'a>(events: &'a [CalendarEvent], user: &UserId) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|e| e.is_active() && e.involves(user))
        .collect()
}
