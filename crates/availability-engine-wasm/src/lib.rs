//! WASM bindings for availability-engine.
//!
//! Exposes conflict checks, slot search and free/busy views to JavaScript via
//! `wasm-bindgen`. Complex values cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use std::collections::BTreeSet;

use availability_engine::{AvailabilityQuery, CalendarEvent, EventId, PrivacyLevel, TimeInterval, UserId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Boundary errors
// ---------------------------------------------------------------------------

/// Failures of the JSON bridge, kept free of `JsValue` so they can be
/// exercised natively.
#[derive(Error, Debug, PartialEq)]
enum BridgeError {
    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Invalid datetime: {0}")]
    Datetime(String),

    #[error("{0}")]
    Engine(String),
}

impl From<BridgeError> for JsValue {
    fn from(e: BridgeError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

type BridgeResult<T> = Result<T, BridgeError>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset) and naive local time
/// (e.g., "2026-03-16T09:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> BridgeResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| BridgeError::Datetime(format!("'{}': {}", s, e)))
}

fn parse_interval(start: &str, end: &str) -> BridgeResult<TimeInterval> {
    TimeInterval::new(parse_datetime(start)?, parse_datetime(end)?)
        .map_err(|e| BridgeError::Engine(e.to_string()))
}

fn parse_events(json: &str) -> BridgeResult<Vec<CalendarEvent>> {
    serde_json::from_str(json).map_err(|e| BridgeError::Json(format!("events: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> BridgeResult<String> {
    serde_json::to_string(value).map_err(|e| BridgeError::Json(format!("serialization: {}", e)))
}

fn conflicts_json(
    events_json: &str,
    start: &str,
    end: &str,
    excluding: Option<&str>,
) -> BridgeResult<String> {
    let events = parse_events(events_json)?;
    let candidate = parse_interval(start, end)?;
    let excluding = excluding.map(EventId::from);
    to_json(&availability_engine::find_conflicts(
        &events,
        &candidate,
        excluding.as_ref(),
    ))
}

fn slots_json(events_json: &str, query_json: &str) -> BridgeResult<String> {
    let events = parse_events(events_json)?;
    let query: AvailabilityQuery =
        serde_json::from_str(query_json).map_err(|e| BridgeError::Json(format!("query: {}", e)))?;
    to_json(&availability_engine::find_available_slots(&events, &query))
}

fn free_busy_json(
    events_json: &str,
    participants_json: &str,
    window_start: &str,
    window_end: &str,
    privacy: &str,
) -> BridgeResult<String> {
    let events = parse_events(events_json)?;
    let participants: BTreeSet<UserId> = serde_json::from_str(participants_json)
        .map_err(|e| BridgeError::Json(format!("participants: {}", e)))?;
    let window = parse_interval(window_start, window_end)?;
    let privacy = match privacy {
        "full" => PrivacyLevel::Full,
        "opaque" | "" => PrivacyLevel::Opaque,
        other => return Err(BridgeError::Engine(format!("Unknown privacy level: '{}'", other))),
    };
    to_json(&availability_engine::free_busy(
        &events,
        &participants,
        &window,
        privacy,
    ))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Whether a candidate interval clashes with any active event in `events_json`.
///
/// `events_json` is a JSON array of events (`id`, `creator_id`, `start`, `end`,
/// optional `is_cancelled` and `participant_ids`). Pass the id of the event
/// being updated as `excluding_id` so it is not checked against itself.
#[wasm_bindgen(js_name = "hasConflict")]
pub fn has_conflict(
    events_json: &str,
    candidate_start: &str,
    candidate_end: &str,
    excluding_id: Option<String>,
) -> Result<bool, JsValue> {
    let events = parse_events(events_json)?;
    let candidate = parse_interval(candidate_start, candidate_end)?;
    let excluding = excluding_id.map(EventId::from);
    Ok(availability_engine::has_conflict(
        &events,
        &candidate,
        excluding.as_ref(),
    ))
}

/// Every active event overlapping the candidate, as a JSON array of
/// `{event_id, interval, overlap_minutes}` objects.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    events_json: &str,
    candidate_start: &str,
    candidate_end: &str,
    excluding_id: Option<String>,
) -> Result<String, JsValue> {
    Ok(conflicts_json(
        events_json,
        candidate_start,
        candidate_end,
        excluding_id.as_deref(),
    )?)
}

/// Free slots for a query, as a JSON array of `{start, end, duration_minutes}`.
///
/// `query_json` is `{search_window: {start, end}, slot_duration_minutes,
/// max_slots, participant_ids}`.
#[wasm_bindgen(js_name = "findAvailableSlots")]
pub fn find_available_slots(events_json: &str, query_json: &str) -> Result<String, JsValue> {
    Ok(slots_json(events_json, query_json)?)
}

/// Merged busy blocks and free gaps for the participants listed in
/// `participants_json` (a JSON array of user ids). `privacy` is `"full"` or
/// `"opaque"`.
#[wasm_bindgen(js_name = "freeBusy")]
pub fn free_busy(
    events_json: &str,
    participants_json: &str,
    window_start: &str,
    window_end: &str,
    privacy: &str,
) -> Result<String, JsValue> {
    Ok(free_busy_json(
        events_json,
        participants_json,
        window_start,
        window_end,
        privacy,
    )?)
}
