//! Adapters from stored schedule rows to engine inputs.
//!
//! Schedule rows are stored one per class meeting per weekday, with the day as an
//! integer (Sunday = 0 ... Saturday = 6) and times as raw strings. This module
//! picks the rows for the reference instant's weekday, parses them, and runs the
//! classifier. Parsing errors are returned, never skipped: a corrupt row must not
//! leave its room looking free.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::hours::{is_weekend, DailyHours, WeeklyHours};
use crate::occupancy::ScheduleBlock;
use crate::status::AvailabilityPolicy;
use crate::time::TimeOfDay;
use crate::verdict::{verdict_with_policy, AvailabilityVerdict};

/// One stored class meeting on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Sunday = 0 ... Saturday = 6.
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
}

impl ScheduleRow {
    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_index(self.day_of_week)
    }

    /// Parse this row into a block labelled with its course code.
    ///
    /// Rows whose end does not follow their start are kept (they never count as
    /// in progress and never widen a free window) but logged.
    ///
    /// # Errors
    /// Returns `EngineError::MalformedTime` if either time does not parse.
    pub fn to_block(&self) -> Result<ScheduleBlock> {
        let start_time: TimeOfDay = self.start_time.parse()?;
        let end_time: TimeOfDay = self.end_time.parse()?;

        let block = ScheduleBlock {
            start_time,
            end_time,
            label: self.course_code.clone(),
        };
        if block.is_degenerate() {
            warn!(
                start = %start_time,
                end = %end_time,
                course = ?self.course_code,
                "schedule row ends before it starts"
            );
        }
        Ok(block)
    }
}

/// Map a stored day index (Sunday = 0) to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Parse a catalog meeting-days pattern such as `MWF` or `TuTh`.
///
/// Two-letter abbreviations (`Tu`, `Th`, `Sa`, `Su`) are matched before the
/// single letters `M`, `W`, `F`.
///
/// # Errors
/// Returns `EngineError::InvalidDays` on an empty pattern or an unknown abbreviation.
pub fn parse_days(pattern: &str) -> Result<Vec<Weekday>> {
    let invalid = || EngineError::InvalidDays(pattern.to_string());
    if pattern.is_empty() {
        return Err(invalid());
    }

    let mut days = Vec::new();
    let mut rest = pattern;
    while !rest.is_empty() {
        let (day, len) = match rest.get(..2) {
            Some("Tu") => (Weekday::Tue, 2),
            Some("Th") => (Weekday::Thu, 2),
            Some("Sa") => (Weekday::Sat, 2),
            Some("Su") => (Weekday::Sun, 2),
            _ => match rest.chars().next() {
                Some('M') => (Weekday::Mon, 1),
                Some('W') => (Weekday::Wed, 1),
                Some('F') => (Weekday::Fri, 1),
                _ => return Err(invalid()),
            },
        };
        days.push(day);
        rest = &rest[len..];
    }
    Ok(days)
}

/// Parse a catalog time range such as `9-11:45AM` or `2:30-3:45PM`.
///
/// The `AM`/`PM` suffix belongs to the end time. The start is first read in the
/// same half of the day and moved back twelve hours when that would not put it
/// before the end, so `11-12:50PM` is 11:00 to 12:50.
///
/// # Errors
/// Returns `EngineError::MalformedTimeRange` if the text is not
/// `H[:MM]-H[:MM]AM` / `PM` or the start cannot precede the end.
pub fn parse_time_range(text: &str) -> Result<(TimeOfDay, TimeOfDay)> {
    let malformed = || EngineError::MalformedTimeRange(text.to_string());

    let trimmed = text.trim();
    let (range, pm) = if let Some(range) = trimmed.strip_suffix("PM") {
        (range, true)
    } else if let Some(range) = trimmed.strip_suffix("AM") {
        (range, false)
    } else {
        return Err(malformed());
    };

    let (start, end) = range.split_once('-').ok_or_else(malformed)?;
    let (start_hour, start_minute) = parse_clock(start).ok_or_else(malformed)?;
    let (end_hour, end_minute) = parse_clock(end).ok_or_else(malformed)?;

    let end_hour = to_24_hour(end_hour, pm);
    let mut start_hour = to_24_hour(start_hour, pm);
    if (start_hour, start_minute) >= (end_hour, end_minute) {
        start_hour = start_hour.checked_sub(12).ok_or_else(malformed)?;
    }

    let start = TimeOfDay::from_hms(start_hour, start_minute, 0).map_err(|_| malformed())?;
    let end = TimeOfDay::from_hms(end_hour, end_minute, 0).map_err(|_| malformed())?;
    Ok((start, end))
}

/// `H`, `HH`, `H:MM` or `HH:MM` on a twelve-hour clock.
fn parse_clock(text: &str) -> Option<(u32, u32)> {
    let (hour, minute) = match text.split_once(':') {
        Some((hour, minute)) if minute.len() == 2 => (hour, minute),
        Some(_) => return None,
        None => (text, "00"),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if hour.len() > 2 || !digits(hour) || !digits(minute) {
        return None;
    }

    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    ((1..=12).contains(&hour) && minute <= 59).then_some((hour, minute))
}

fn to_24_hour(hour: u32, pm: bool) -> u32 {
    match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    }
}

/// When a catalog meeting takes place: a catalog range or explicit times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeetingTime {
    /// Catalog text such as `2:30-3:45PM`.
    Catalog { time: String },
    /// `HH:MM` or `HH:MM:SS` times, stored as given.
    Explicit { start_time: String, end_time: String },
}

impl MeetingTime {
    fn bounds(&self) -> Result<(String, String)> {
        match self {
            Self::Catalog { time } => {
                let (start, end) = parse_time_range(time)?;
                Ok((start.to_string(), end.to_string()))
            }
            Self::Explicit {
                start_time,
                end_time,
            } => Ok((start_time.clone(), end_time.clone())),
        }
    }
}

/// A class section meeting on several weekdays at the same time, as listed in
/// the course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Catalog days pattern, e.g. `MWF`.
    pub days: String,
    #[serde(flatten)]
    pub time: MeetingTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
}

impl Meeting {
    /// Expand into one stored row per meeting day.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDays` if the days pattern does not parse, or
    /// `EngineError::MalformedTimeRange` for an unreadable catalog time.
    pub fn to_rows(&self) -> Result<Vec<ScheduleRow>> {
        let days = parse_days(&self.days)?;
        let (start_time, end_time) = self.time.bounds()?;
        Ok(days
            .into_iter()
            .map(|day| ScheduleRow {
                day_of_week: day.num_days_from_sunday() as u8,
                start_time: start_time.clone(),
                end_time: end_time.clone(),
                course_code: self.course_code.clone(),
                course_title: None,
                instructor_name: None,
            })
            .collect())
    }
}

/// Parse the rows meeting on `day` into blocks.
///
/// # Errors
/// Returns the first `EngineError::MalformedTime` among the rows for `day`.
pub fn blocks_for_day(rows: &[ScheduleRow], day: Weekday) -> Result<Vec<ScheduleBlock>> {
    rows.iter()
        .filter(|row| row.weekday() == Some(day))
        .map(ScheduleRow::to_block)
        .collect()
}

/// Weekday building hours derived from class rows: open at the earliest weekday
/// class start, close at the latest weekday class end. Weekend rows are ignored
/// and no hours are recorded when there are no weekday rows.
///
/// # Errors
/// Returns `EngineError::MalformedTime` for an unparseable weekday row, or
/// `EngineError::InvalidInterval` if the derived window is empty.
pub fn derive_weekly_hours(rows: &[ScheduleRow]) -> Result<WeeklyHours> {
    let mut bounds: Option<(TimeOfDay, TimeOfDay)> = None;

    for row in rows {
        if row.weekday().is_none_or(is_weekend) {
            continue;
        }
        let block = row.to_block()?;
        bounds = Some(match bounds {
            Some((open, close)) => (open.min(block.start_time), close.max(block.end_time)),
            None => (block.start_time, block.end_time),
        });
    }

    match bounds {
        Some((open, close)) => WeeklyHours::weekdays(open, close),
        None => Ok(WeeklyHours::default()),
    }
}

/// Assess one room from its building's weekly hours and its stored rows.
///
/// # Errors
/// Returns `EngineError::MalformedTime` if any row for the day of `at` is corrupt.
pub fn assess_room<Tz: TimeZone>(
    hours: Option<&WeeklyHours>,
    rows: &[ScheduleRow],
    at: &DateTime<Tz>,
) -> Result<AvailabilityVerdict<Tz>> {
    assess_room_with_policy(&AvailabilityPolicy::default(), hours, rows, at)
}

pub fn assess_room_with_policy<Tz: TimeZone>(
    policy: &AvailabilityPolicy,
    hours: Option<&WeeklyHours>,
    rows: &[ScheduleRow],
    at: &DateTime<Tz>,
) -> Result<AvailabilityVerdict<Tz>> {
    let day = at.weekday();
    let blocks = blocks_for_day(rows, day)?;
    let daily: Option<&DailyHours> = hours.and_then(|h| h.hours_on(day));
    Ok(verdict_with_policy(policy, daily, &blocks, at))
}

/// A classroom and its weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    /// Building code, e.g. `ECS`.
    pub building: String,
    pub room_number: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleRow>,
    /// Catalog-style meetings, expanded into rows alongside `schedule`.
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

impl Room {
    /// `BUILDING-ROOM`, the way the catalog writes locations.
    pub fn location(&self) -> String {
        format!("{}-{}", self.building, self.room_number)
    }

    /// Stored rows plus rows expanded from catalog meetings.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDays` if a meeting's days pattern is invalid.
    pub fn rows(&self) -> Result<Vec<ScheduleRow>> {
        let mut rows = self.schedule.clone();
        for meeting in &self.meetings {
            rows.extend(meeting.to_rows()?);
        }
        Ok(rows)
    }
}

/// Verdict for one room in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomVerdict<Tz: TimeZone> {
    pub room_id: String,
    pub location: String,
    pub verdict: Result<AvailabilityVerdict<Tz>>,
}

/// Assess every room against the same reference instant.
///
/// Rooms are independent: a room with corrupt rows reports its error without
/// affecting the others. Results keep the input order. A room whose building is
/// missing from `buildings` is treated as having no recorded hours.
pub fn assess_rooms<Tz: TimeZone>(
    policy: &AvailabilityPolicy,
    rooms: &[Room],
    buildings: &HashMap<String, WeeklyHours>,
    at: &DateTime<Tz>,
) -> Vec<RoomVerdict<Tz>> {
    rooms
        .iter()
        .map(|room| {
            let hours = buildings.get(&room.building);
            let verdict = room
                .rows()
                .and_then(|rows| assess_room_with_policy(policy, hours, &rows, at));
            if let Err(e) = &verdict {
                warn!(room = %room.id, error = %e, "room assessment failed");
            }
            RoomVerdict {
                room_id: room.id.clone(),
                location: room.location(),
                verdict,
            }
        })
        .collect()
}
