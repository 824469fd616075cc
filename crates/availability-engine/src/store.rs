//! The event store boundary.
//!
//! The engine reads snapshots from an [`EventSource`] and never writes back.
//! Errors from the source are returned to the caller untouched.

use std::collections::BTreeSet;
use std::convert::Infallible;

use tracing::debug;

use crate::availability::find_available_slots;
use crate::conflict::{commitments_for, find_conflicts, has_conflict, Conflict};
use crate::event::{CalendarEvent, EventId, UserId};
use crate::interval::TimeInterval;
use crate::slots::{AvailabilityQuery, TimeSlot};

/// A read-only source of calendar event snapshots.
pub trait EventSource {
    type Error;

    /// Events involving any of `participants` that may overlap `window`.
    ///
    /// Implementations may over-fetch (including cancelled events or events
    /// outside the window); the engine filters again.
    fn events_in_window(
        &self,
        participants: &BTreeSet<UserId>,
        window: &TimeInterval,
    ) -> Result<Vec<CalendarEvent>, Self::Error>;

    /// Every event created by or involving `user`.
    fn events_for_user(&self, user: &UserId) -> Result<Vec<CalendarEvent>, Self::Error>;
}

/// A `Vec`-backed event source.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Vec<CalendarEvent>,
}

impl InMemoryEventStore {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }
}

impl From<Vec<CalendarEvent>> for InMemoryEventStore {
    fn from(events: Vec<CalendarEvent>) -> Self {
        Self::new(events)
    }
}

impl EventSource for InMemoryEventStore {
    type Error = Infallible;

    fn events_in_window(
        &self,
        participants: &BTreeSet<UserId>,
        window: &TimeInterval,
    ) -> Result<Vec<CalendarEvent>, Self::Error> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.interval.overlaps(window) && e.involves_any(participants))
            .cloned()
            .collect())
    }

    fn events_for_user(&self, user: &UserId) -> Result<Vec<CalendarEvent>, Self::Error> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.involves(user))
            .cloned()
            .collect())
    }
}

fn user_commitments<S: EventSource>(
    source: &S,
    user: &UserId,
) -> Result<Vec<CalendarEvent>, S::Error> {
    let events = source.events_for_user(user)?;
    Ok(commitments_for(&events, user)
        .into_iter()
        .cloned()
        .collect())
}

/// Fetch `user`'s commitments from `source` and test `candidate` against them.
pub fn check_conflict<S: EventSource>(
    source: &S,
    user: &UserId,
    candidate: &TimeInterval,
    excluding: Option<&EventId>,
) -> Result<bool, S::Error> {
    let active = user_commitments(source, user)?;
    let conflict = has_conflict(&active, candidate, excluding);
    debug!(user = %user, commitments = active.len(), conflict, "conflict check");
    Ok(conflict)
}

/// Fetch `user`'s commitments once and report every one blocking `candidate`.
///
/// The candidate conflicts iff the returned list is non-empty.
pub fn conflicts_for_user<S: EventSource>(
    source: &S,
    user: &UserId,
    candidate: &TimeInterval,
    excluding: Option<&EventId>,
) -> Result<Vec<Conflict>, S::Error> {
    let active = user_commitments(source, user)?;
    let conflicts = find_conflicts(&active, candidate, excluding);
    debug!(
        user = %user,
        commitments = active.len(),
        conflicts = conflicts.len(),
        "conflict report"
    );
    Ok(conflicts)
}

/// Fetch the participants' events in the query window from `source` and search
/// for free slots.
pub fn search_availability<S: EventSource>(
    source: &S,
    query: &AvailabilityQuery,
) -> Result<Vec<TimeSlot>, S::Error> {
    let events = source.events_in_window(query.participant_ids(), query.search_window())?;
    Ok(find_available_slots(&events, query))
}
