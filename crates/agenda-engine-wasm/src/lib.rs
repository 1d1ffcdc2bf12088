//! WASM bindings for agenda-engine.
//!
//! Exposes recurrence projection, conflict detection and store mutations to a
//! JavaScript calendar UI via `wasm-bindgen`. The UI keeps the persisted `"events"`
//! blob itself; every call takes that blob (a JSON object keyed by `YYYY-MM-DD`)
//! and mutations return the updated blob for the caller to save.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p agenda-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/agenda-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/agenda_engine_wasm.wasm
//! ```

use agenda_engine::persistence::{decode_snapshot, encode_snapshot};
use agenda_engine::{clock, Event, EventStore, TimeWindow};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto {
    id: String,
    name: String,
    anchor_date: String,
    start_time: String,
    end_time: String,
    overlap_minutes: i64,
}

// ---------------------------------------------------------------------------
// Helpers: parse boundary inputs
// ---------------------------------------------------------------------------

/// Decode the persisted blob. An empty string is treated as an empty calendar.
fn parse_store(events_json: &str) -> Result<EventStore, String> {
    if events_json.trim().is_empty() {
        return Ok(EventStore::new());
    }
    decode_snapshot(events_json)
        .map(EventStore::from_snapshot)
        .map_err(|e| format!("Invalid events JSON: {}", e))
}

fn parse_event(event_json: &str) -> Result<Event, String> {
    serde_json::from_str(event_json).map_err(|e| format!("Invalid event JSON: {}", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    clock::parse_clock_time(s).map_err(|e| e.to_string())
}

fn to_blob(store: &EventStore) -> Result<String, String> {
    encode_snapshot(&store.snapshot()).map_err(|e| format!("Serialization error: {}", e))
}

fn relevant_json(events_json: &str, target: &str, exclude_id: Option<&str>) -> Result<String, String> {
    let store = parse_store(events_json)?;
    let target = parse_date(target)?;
    let relevant = agenda_engine::find_relevant_occurrences(&store, target, exclude_id);
    serde_json::to_string(&relevant).map_err(|e| format!("Serialization error: {}", e))
}

fn conflicts_json(
    events_json: &str,
    target: &str,
    start: &str,
    end: &str,
    exclude_id: Option<&str>,
) -> Result<String, String> {
    let store = parse_store(events_json)?;
    let target = parse_date(target)?;
    let window = TimeWindow::new(parse_time(start)?, parse_time(end)?).map_err(|e| e.to_string())?;

    let dtos: Vec<ConflictDto> = agenda_engine::find_conflicts(&store, target, &window, exclude_id)
        .iter()
        .map(|c| ConflictDto {
            id: c.occurrence.id.clone(),
            name: c.occurrence.name.clone(),
            anchor_date: c.occurrence.date.to_string(),
            start_time: clock::format_clock_time(c.occurrence.start_time),
            end_time: clock::format_clock_time(c.occurrence.end_time),
            overlap_minutes: c.overlap_minutes,
        })
        .collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn add_json(events_json: &str, event_json: &str) -> Result<String, String> {
    let mut store = parse_store(events_json)?;
    store.add(parse_event(event_json)?).map_err(|e| e.to_string())?;
    to_blob(&store)
}

fn edit_json(events_json: &str, event_json: &str) -> Result<String, String> {
    let mut store = parse_store(events_json)?;
    store.edit(parse_event(event_json)?);
    to_blob(&store)
}

fn delete_json(events_json: &str, id: &str, date: &str) -> Result<String, String> {
    let mut store = parse_store(events_json)?;
    store.delete(id, parse_date(date)?);
    to_blob(&store)
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Events with an occurrence on `target_date` (`YYYY-MM-DD`), as a JSON array.
///
/// Pass the id of the event being edited as `exclude_id` so it is not reported
/// against itself.
#[wasm_bindgen(js_name = "findRelevantOccurrences")]
pub fn find_relevant_occurrences(
    events_json: &str,
    target_date: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    relevant_json(events_json, target_date, exclude_id.as_deref()).map_err(js_err)
}

/// Occurrences on `target_date` that overlap `[start_time, end_time)`.
///
/// Times accept `"9:30 AM"` or `"09:30"`. Returns a JSON array of
/// `{id, name, anchorDate, startTime, endTime, overlapMinutes}`; an empty array
/// means the slot is free.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    events_json: &str,
    target_date: &str,
    start_time: &str,
    end_time: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    conflicts_json(
        events_json,
        target_date,
        start_time,
        end_time,
        exclude_id.as_deref(),
    )
    .map_err(js_err)
}

/// Insert an event and return the updated blob. Fails on a direct same-day overlap.
#[wasm_bindgen(js_name = "addEvent")]
pub fn add_event(events_json: &str, event_json: &str) -> Result<String, JsValue> {
    add_json(events_json, event_json).map_err(js_err)
}

/// Replace the event with the same id on its anchor day and return the updated blob.
#[wasm_bindgen(js_name = "editEvent")]
pub fn edit_event(events_json: &str, event_json: &str) -> Result<String, JsValue> {
    edit_json(events_json, event_json).map_err(js_err)
}

/// Remove an event and return the updated blob.
#[wasm_bindgen(js_name = "deleteEvent")]
pub fn delete_event(events_json: &str, id: &str, date: &str) -> Result<String, JsValue> {
    delete_json(events_json, id, date).map_err(js_err)
}
