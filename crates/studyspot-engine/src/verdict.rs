//! Flat availability verdict consumed by list and map views.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::format::status_text;
use crate::hours::DailyHours;
use crate::occupancy::ScheduleBlock;
use crate::status::{classify_with_policy, Assessment, AvailabilityPolicy, RoomStatus};

/// The complete availability output for one room at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = ""))]
pub struct AvailabilityVerdict<Tz: TimeZone> {
    pub status: RoomStatus,
    pub is_available: bool,
    pub is_building_open: bool,
    pub next_transition_at: Option<DateTime<Tz>>,
    pub current_occupancy_ends_at: Option<DateTime<Tz>>,
    pub minutes_until_next_occupancy: Option<i64>,
    pub status_text: String,
}

impl<Tz: TimeZone> From<&Assessment<Tz>> for AvailabilityVerdict<Tz> {
    fn from(assessment: &Assessment<Tz>) -> Self {
        let (current_occupancy_ends_at, minutes_until_next_occupancy) = match assessment {
            Assessment::InUse { occupied_until, .. } => (Some(occupied_until.clone()), Some(0)),
            Assessment::Limited {
                minutes_until_next_occupancy,
                ..
            } => (None, Some(*minutes_until_next_occupancy)),
            Assessment::Open {
                minutes_until_next_occupancy,
                ..
            } => (None, *minutes_until_next_occupancy),
            Assessment::Closed { .. } => (None, None),
        };

        Self {
            status: assessment.status(),
            is_available: assessment.is_available(),
            is_building_open: assessment.is_building_open(),
            next_transition_at: assessment.next_transition_at().cloned(),
            current_occupancy_ends_at,
            minutes_until_next_occupancy,
            status_text: status_text(assessment),
        }
    }
}

/// Classify a room with the default policy and render the verdict.
pub fn verdict<Tz: TimeZone>(
    hours: Option<&DailyHours>,
    blocks: &[ScheduleBlock],
    at: &DateTime<Tz>,
) -> AvailabilityVerdict<Tz> {
    verdict_with_policy(&AvailabilityPolicy::default(), hours, blocks, at)
}

pub fn verdict_with_policy<Tz: TimeZone>(
    policy: &AvailabilityPolicy,
    hours: Option<&DailyHours>,
    blocks: &[ScheduleBlock],
    at: &DateTime<Tz>,
) -> AvailabilityVerdict<Tz> {
    AvailabilityVerdict::from(&classify_with_policy(policy, hours, blocks, at))
}
