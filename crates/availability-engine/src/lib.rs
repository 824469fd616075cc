//! # availability-engine
//!
//! Conflict detection and multi-participant free slot search for calendar
//! backends.
//!
//! All functions are pure and synchronous over immutable event snapshots. The
//! only I/O happens behind an [`store::EventSource`] supplied by the caller.
//!
//! ## Modules
//!
//! - [`interval`] — half-open time intervals and the overlap primitive
//! - [`event`] — calendar event snapshots and identifiers
//! - [`conflict`] — single-user conflict checks (create/update paths)
//! - [`collector`] — busy intervals for a participant set within a window
//! - [`merge`] — collapse busy intervals into disjoint busy blocks
//! - [`slots`] — first-fit free slot search
//! - [`availability`] — the slot search pipeline and free/busy view
//! - [`store`] — the event source boundary
//! - [`error`] — Error types

pub mod availability;
pub mod collector;
pub mod conflict;
pub mod error;
pub mod event;
pub mod interval;
pub mod merge;
pub mod slots;
pub mod store;

pub use availability::{find_available_slots, free_busy, FreeBusyView, PrivacyLevel};
pub use collector::collect_busy_intervals;
pub use conflict::{find_conflicts, has_conflict, Conflict};
pub use error::EngineError;
pub use event::{CalendarEvent, EventId, UserId};
pub use interval::TimeInterval;
pub use merge::merge_intervals;
pub use slots::{find_slots, AvailabilityQuery, TimeSlot};
pub use store::{EventSource, InMemoryEventStore};
