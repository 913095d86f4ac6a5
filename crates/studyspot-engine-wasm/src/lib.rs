//! WASM bindings for studyspot-engine.
//!
//! Exposes room assessment and duration formatting to JavaScript via
//! `wasm-bindgen`. Rooms and verdicts cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p studyspot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/studyspot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use studyspot_engine::rooms::{assess_room_with_policy, Meeting};
use studyspot_engine::{AvailabilityPolicy, AvailabilityVerdict, ScheduleRow, WeeklyHours};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// One room as sent from JavaScript.
#[derive(Deserialize)]
struct RoomInput {
    #[serde(default)]
    hours: Option<WeeklyHours>,
    #[serde(default)]
    schedule: Vec<ScheduleRow>,
    #[serde(default)]
    meetings: Vec<Meeting>,
    #[serde(default)]
    policy: AvailabilityPolicy,
}

/// Verdict with instants rendered as RFC 3339 strings in the schedule's zone.
#[derive(Serialize)]
struct VerdictDto {
    status: &'static str,
    is_available: bool,
    is_building_open: bool,
    next_transition_at: Option<String>,
    current_occupancy_ends_at: Option<String>,
    minutes_until_next_occupancy: Option<i64>,
    status_text: String,
}

impl From<&AvailabilityVerdict<Tz>> for VerdictDto {
    fn from(v: &AvailabilityVerdict<Tz>) -> Self {
        Self {
            status: v.status.as_str(),
            is_available: v.is_available,
            is_building_open: v.is_building_open,
            next_transition_at: v.next_transition_at.as_ref().map(DateTime::to_rfc3339),
            current_occupancy_ends_at: v.current_occupancy_ends_at.as_ref().map(DateTime::to_rfc3339),
            minutes_until_next_occupancy: v.minutes_until_next_occupancy,
            status_text: v.status_text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the reference instant and place it in `timezone`.
///
/// Accepts RFC 3339 (with offset, e.g. "2026-03-16T16:30:00Z") and naive local
/// time (e.g. "2026-03-16T09:30:00"), which is read as wall-clock time in
/// `timezone`.
fn parse_instant(at: &str, timezone: &str) -> Result<DateTime<Tz>, String> {
    let tz: Tz = timezone
        .parse()
        .map_err(|e| format!("Invalid timezone '{}': {}", timezone, e))?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(at) {
        return Ok(dt.with_timezone(&tz));
    }
    let naive = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("Invalid datetime '{}': {}", at, e))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("Datetime '{}' does not exist in {}", at, timezone))
}

fn assess_room_json(input_json: &str, at: &str, timezone: &str) -> Result<String, String> {
    let room: RoomInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid room JSON: {}", e))?;
    let at = parse_instant(at, timezone)?;

    let mut rows = room.schedule;
    for meeting in &room.meetings {
        rows.extend(meeting.to_rows().map_err(|e| e.to_string())?);
    }

    let verdict = assess_room_with_policy(&room.policy, room.hours.as_ref(), &rows, &at)
        .map_err(|e| e.to_string())?;

    serde_json::to_string(&VerdictDto::from(&verdict))
        .map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Assess one room at a reference instant.
///
/// `input_json` is an object with optional `hours` (weekly building hours),
/// `schedule` (stored rows), `meetings` (catalog meetings such as `MWF`), and
/// `policy` (thresholds). Returns the verdict as a JSON string.
///
/// # Arguments
/// - `at` -- Reference instant, RFC 3339 or naive local time in `timezone`
/// - `timezone` -- IANA zone the schedule times are written in (e.g. "America/Los_Angeles")
#[wasm_bindgen(js_name = "assessRoom")]
pub fn assess_room(input_json: &str, at: &str, timezone: &str) -> Result<String, JsValue> {
    assess_room_json(input_json, at, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Format a minute count as `2h 15m`, `45m`, or `2h`.
#[wasm_bindgen(js_name = "formatDuration")]
pub fn format_duration(minutes: i32) -> String {
    studyspot_engine::format::format_duration(i64::from(minutes))
}
