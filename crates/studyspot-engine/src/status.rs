//! Classify a room at a reference instant into one of four availability states.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. `Closed` on weekends, when no hours are recorded, when the room has no
//!    classes that day, before opening, and after closing.
//! 2. `InUse` when a class is in progress.
//! 3. `Limited` when the next class starts within the limited threshold.
//! 4. `Open` otherwise.
//!
//! A room with no classes on a day counts as closed even while its building is
//! open: only rooms with at least one class are known to be unlocked.

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::freebusy::{find_next_usable_window, UsableWindow, MIN_USABLE_MINUTES};
use crate::hours::{self, is_weekend, DailyHours};
use crate::occupancy::{scan, ScheduleBlock};
use crate::time::minutes_between;

/// Minutes before a class starts during which a free room is only `Limited`.
pub const LIMITED_THRESHOLD_MINUTES: i64 = 30;

/// Tunable thresholds for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityPolicy {
    /// Shortest gap reported as a usable window.
    pub min_usable_minutes: i64,
    /// A free room whose next class starts sooner than this is `Limited`.
    pub limited_threshold_minutes: i64,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self {
            min_usable_minutes: MIN_USABLE_MINUTES,
            limited_threshold_minutes: LIMITED_THRESHOLD_MINUTES,
        }
    }
}

/// The four availability states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Open,
    InUse,
    Limited,
    Closed,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InUse => "IN_USE",
            Self::Limited => "LIMITED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Why a room is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum ClosedReason<Tz: TimeZone> {
    Weekend,
    /// The building has no hours recorded for the day.
    NoHours,
    /// The room has no classes scheduled for the day.
    NoClasses,
    NotYetOpen {
        opens_at: DateTime<Tz>,
    },
    AfterHours,
}

/// Classification result, carrying only the facts relevant to each state.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment<Tz: TimeZone> {
    Closed {
        reason: ClosedReason<Tz>,
        building_open: bool,
    },
    InUse {
        occupied_until: DateTime<Tz>,
        label: Option<String>,
        /// First usable window from the end of the current class.
        next_window: Option<UsableWindow<Tz>>,
    },
    Limited {
        next_occupancy_at: DateTime<Tz>,
        minutes_until_next_occupancy: i64,
        /// First usable window from the reference instant.
        next_window: Option<UsableWindow<Tz>>,
    },
    Open {
        /// The next class start or the building close, whichever is sooner.
        free_until: DateTime<Tz>,
        free_minutes: i64,
        minutes_until_next_occupancy: Option<i64>,
    },
}

impl<Tz: TimeZone> Assessment<Tz> {
    pub fn status(&self) -> RoomStatus {
        match self {
            Self::Closed { .. } => RoomStatus::Closed,
            Self::InUse { .. } => RoomStatus::InUse,
            Self::Limited { .. } => RoomStatus::Limited,
            Self::Open { .. } => RoomStatus::Open,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn is_building_open(&self) -> bool {
        match self {
            Self::Closed { building_open, .. } => *building_open,
            _ => true,
        }
    }

    /// When the state is next expected to change, if known.
    pub fn next_transition_at(&self) -> Option<&DateTime<Tz>> {
        match self {
            Self::Closed {
                reason: ClosedReason::NotYetOpen { opens_at },
                ..
            } => Some(opens_at),
            Self::Closed { .. } => None,
            Self::InUse { occupied_until, .. } => Some(occupied_until),
            Self::Limited {
                next_occupancy_at, ..
            } => Some(next_occupancy_at),
            Self::Open { free_until, .. } => Some(free_until),
        }
    }
}

/// Classify a room with the default policy.
///
/// `hours` are the building's hours for the day of `at`; `blocks` are the room's
/// class blocks for that day, in any order.
pub fn classify<Tz: TimeZone>(
    hours: Option<&DailyHours>,
    blocks: &[ScheduleBlock],
    at: &DateTime<Tz>,
) -> Assessment<Tz> {
    classify_with_policy(&AvailabilityPolicy::default(), hours, blocks, at)
}

/// Classify a room with explicit thresholds.
pub fn classify_with_policy<Tz: TimeZone>(
    policy: &AvailabilityPolicy,
    hours: Option<&DailyHours>,
    blocks: &[ScheduleBlock],
    at: &DateTime<Tz>,
) -> Assessment<Tz> {
    let assessment = assess(policy, hours, blocks, at);
    debug!(
        status = ?assessment.status(),
        blocks = blocks.len(),
        "classified room"
    );
    assessment
}

fn assess<Tz: TimeZone>(
    policy: &AvailabilityPolicy,
    hours: Option<&DailyHours>,
    blocks: &[ScheduleBlock],
    at: &DateTime<Tz>,
) -> Assessment<Tz> {
    let closed = |reason, building_open| Assessment::Closed {
        reason,
        building_open,
    };

    if is_weekend(at.weekday()) {
        return closed(ClosedReason::Weekend, false);
    }

    let gate = hours::evaluate(hours, at);
    let (Some(opens_at), Some(closes_at)) = (gate.opens_at, gate.closes_at) else {
        return closed(ClosedReason::NoHours, false);
    };

    if blocks.is_empty() {
        return closed(ClosedReason::NoClasses, gate.is_open);
    }
    if *at < opens_at {
        return closed(ClosedReason::NotYetOpen { opens_at }, false);
    }
    if *at > closes_at {
        return closed(ClosedReason::AfterHours, false);
    }

    let occupancy = scan(blocks, at);

    if let Some(current) = occupancy.current {
        let next_window =
            find_next_usable_window(blocks, &current.end, &closes_at, policy.min_usable_minutes);
        return Assessment::InUse {
            occupied_until: current.end,
            label: current.block.label.clone(),
            next_window,
        };
    }

    let minutes_until_next = occupancy
        .next
        .as_ref()
        .map(|next| minutes_between(at, &next.start));

    if let (Some(next), Some(minutes)) = (occupancy.next.as_ref(), minutes_until_next) {
        if minutes < policy.limited_threshold_minutes {
            let next_window =
                find_next_usable_window(blocks, at, &closes_at, policy.min_usable_minutes);
            return Assessment::Limited {
                next_occupancy_at: next.start.clone(),
                minutes_until_next_occupancy: minutes,
                next_window,
            };
        }
    }

    let free_until = match occupancy.next {
        Some(next) if next.start < closes_at => next.start,
        _ => closes_at,
    };

    Assessment::Open {
        free_minutes: minutes_between(at, &free_until),
        free_until,
        minutes_until_next_occupancy: minutes_until_next,
    }
}
