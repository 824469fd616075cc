//! Calendar event snapshots as read from an event store.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Opaque identifier of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

/// Opaque identifier of a user (creator or participant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(EventId);
string_id!(UserId);

/// A read-only snapshot of one event.
///
/// The creator is implicitly a participant: [`CalendarEvent::involves`] is true
/// for them even when `participant_ids` does not list them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub creator_id: UserId,
    #[serde(flatten)]
    pub interval: TimeInterval,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub participant_ids: BTreeSet<UserId>,
}

impl CalendarEvent {
    /// An active event with no participants besides its creator.
    pub fn new(id: impl Into<EventId>, creator_id: impl Into<UserId>, interval: TimeInterval) -> Self {
        Self {
            id: id.into(),
            creator_id: creator_id.into(),
            interval,
            is_cancelled: false,
            participant_ids: BTreeSet::new(),
        }
    }

    pub fn with_participants<I, U>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        self.participant_ids
            .extend(participants.into_iter().map(Into::into));
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.is_cancelled
    }

    /// True if `user` created the event or is listed as a participant.
    pub fn involves(&self, user: &UserId) -> bool {
        self.creator_id == *user || self.participant_ids.contains(user)
    }

    pub fn involves_any(&self, users: &BTreeSet<UserId>) -> bool {
        users.iter().any(|u| self.involves(u))
    }
}
