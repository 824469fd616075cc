//! Tests for the event source boundary.

use std::cell::Cell;
use std::collections::BTreeSet;

use availability_engine::store::{check_conflict, conflicts_for_user, search_availability};
use availability_engine::{
    AvailabilityQuery, CalendarEvent, EventId, EventSource, InMemoryEventStore, TimeInterval,
    TimeSlot, UserId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> TimeInterval {
    TimeInterval::new(at(sh, sm), at(eh, em)).unwrap()
}

fn store() -> InMemoryEventStore {
    InMemoryEventStore::new(vec![
        CalendarEvent::new("standup", "alice", iv(9, 15, 9, 45)),
        CalendarEvent::new("planning", "bob", iv(10, 0, 11, 0)).with_participants(["alice"]),
        CalendarEvent::new("dropped", "alice", iv(13, 0, 14, 0)).cancelled(),
        CalendarEvent::new("carol-only", "carol", iv(15, 0, 16, 0)),
    ])
}

/// A source whose backend is down.
struct Unavailable;

impl EventSource for Unavailable {
    type Error = String;

    fn events_in_window(
        &self,
        _participants: &BTreeSet<UserId>,
        _window: &TimeInterval,
    ) -> Result<Vec<CalendarEvent>, Self::Error> {
        Err("connection refused".to_string())
    }

    fn events_for_user(&self, _user: &UserId) -> Result<Vec<CalendarEvent>, Self::Error> {
        Err("connection refused".to_string())
    }
}

/// Wraps the in-memory store and counts fetches.
struct Counting {
    inner: InMemoryEventStore,
    fetches: Cell<usize>,
}

impl EventSource for Counting {
    type Error = std::convert::Infallible;

    fn events_in_window(
        &self,
        participants: &BTreeSet<UserId>,
        window: &TimeInterval,
    ) -> Result<Vec<CalendarEvent>, Self::Error> {
        self.fetches.set(self.fetches.get() + 1);
        self.inner.events_in_window(participants, window)
    }

    fn events_for_user(&self, user: &UserId) -> Result<Vec<CalendarEvent>, Self::Error> {
        self.fetches.set(self.fetches.get() + 1);
        self.inner.events_for_user(user)
    }
}

#[test]
fn events_for_user_includes_created_and_joined() {
    let events = store().events_for_user(&UserId::from("alice")).unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["standup", "planning", "dropped"]);
}

#[test]
fn events_in_window_filters_by_participant_and_time() {
    let participants: BTreeSet<UserId> = [UserId::from("alice")].into_iter().collect();
    let events = store()
        .events_in_window(&participants, &iv(9, 30, 12, 0))
        .unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["standup", "planning"]);
}

#[test]
fn check_conflict_against_store() {
    let store = store();
    let alice = UserId::from("alice");

    assert!(check_conflict(&store, &alice, &iv(9, 0, 9, 30), None).unwrap());
    // Cancelled event does not block.
    assert!(!check_conflict(&store, &alice, &iv(13, 0, 14, 0), None).unwrap());
    // Carol's event is not Alice's commitment.
    assert!(!check_conflict(&store, &alice, &iv(15, 0, 16, 0), None).unwrap());
    // Moving her own event does not self-conflict.
    assert!(!check_conflict(
        &store,
        &alice,
        &iv(9, 20, 9, 50),
        Some(&EventId::from("standup"))
    )
    .unwrap());
}

#[test]
fn search_availability_against_store() {
    let participants: BTreeSet<UserId> = ["alice", "carol"].into_iter().map(UserId::from).collect();
    let query =
        AvailabilityQuery::new(iv(9, 0, 17, 0), Duration::minutes(60), 5, participants).unwrap();

    let slots = search_availability(&store(), &query).unwrap();
    assert_eq!(
        slots,
        vec![
            TimeSlot::from(iv(11, 0, 15, 0)),
            TimeSlot::from(iv(16, 0, 17, 0))
        ]
    );
}

#[test]
fn source_errors_propagate_unchanged() {
    let alice = UserId::from("alice");
    let err = check_conflict(&Unavailable, &alice, &iv(9, 0, 10, 0), None).unwrap_err();
    assert_eq!(err, "connection refused");

    let query = AvailabilityQuery::new(
        iv(9, 0, 17, 0),
        Duration::minutes(30),
        1,
        [alice].into_iter().collect(),
    )
    .unwrap();
    assert_eq!(
        search_availability(&Unavailable, &query).unwrap_err(),
        "connection refused"
    );
}

#[test]
fn conflicts_for_user_fetches_once_and_agrees_with_check() {
    let source = Counting {
        inner: store(),
        fetches: Cell::new(0),
    };
    let alice = UserId::from("alice");
    let candidate = iv(9, 30, 13, 30);

    let Ok(conflicts) = conflicts_for_user(&source, &alice, &candidate, None);
    assert_eq!(source.fetches.get(), 1);

    let ids: Vec<&str> = conflicts.iter().map(|c| c.event_id.as_str()).collect();
    // The cancelled 13:00-14:00 event is not reported.
    assert_eq!(ids, vec!["standup", "planning"]);
    assert_eq!(conflicts[0].overlap_minutes, 15);

    let Ok(conflict) = check_conflict(&source, &alice, &candidate, None);
    assert_eq!(conflict, !conflicts.is_empty());
}

#[test]
fn conflicts_for_user_honours_exclusion() {
    let alice = UserId::from("alice");
    let Ok(conflicts) = conflicts_for_user(
        &store(),
        &alice,
        &iv(9, 20, 9, 50),
        Some(&EventId::from("standup")),
    );
    assert!(conflicts.is_empty());
}

#[test]
fn conflicts_for_user_propagates_source_errors() {
    let err = conflicts_for_user(&Unavailable, &UserId::from("alice"), &iv(9, 0, 10, 0), None)
        .unwrap_err();
    assert_eq!(err, "connection refused");
}
