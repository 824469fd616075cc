//! Gather busy time for a set of participants within a search window.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::event::{CalendarEvent, EventId, UserId};
use crate::interval::TimeInterval;

fn relevant<'a>(
    events: &'a [CalendarEvent],
    participants: &'a BTreeSet<UserId>,
    window: &'a TimeInterval,
) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
    events
        .iter()
        .filter(|e| e.is_active())
        .filter(move |e| e.interval.overlaps(window))
        .filter(move |e| e.involves_any(participants))
}

/// Collect the intervals of every active event that involves at least one of
/// `participants` and overlaps `window`.
///
/// An event reachable through several participants (or listed twice by the
/// source) contributes once; the first occurrence by id wins. Intervals are
/// returned unclipped and in input order. An empty participant set yields an
/// empty result.
pub fn collect_busy_intervals(
    events: &[CalendarEvent],
    participants: &BTreeSet<UserId>,
    window: &TimeInterval,
) -> Vec<TimeInterval> {
    let mut seen: HashSet<&EventId> = HashSet::new();
    relevant(events, participants, window)
        .filter(|e| seen.insert(&e.id))
        .map(|e| e.interval)
        .collect()
}

/// Busy intervals keyed by participant.
///
/// Unlike [`collect_busy_intervals`], a shared event appears under every
/// participant it involves. Every queried participant has an entry, possibly
/// empty.
pub fn collect_busy_by_participant(
    events: &[CalendarEvent],
    participants: &BTreeSet<UserId>,
    window: &TimeInterval,
) -> BTreeMap<UserId, Vec<TimeInterval>> {
    let mut by_user: BTreeMap<UserId, Vec<TimeInterval>> = participants
        .iter()
        .map(|u| (u.clone(), Vec::new()))
        .collect();
    let mut seen: HashSet<&EventId> = HashSet::new();

    for event in relevant(events, participants, window) {
        if !seen.insert(&event.id) {
            continue;
        }
        for (user, intervals) in by_user.iter_mut() {
            if event.involves(user) {
                intervals.push(event.interval);
            }
        }
    }

    by_user
}
