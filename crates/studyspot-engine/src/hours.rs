//! Building operating hours and the open/closed gate for a reference instant.
//!
//! Hours are stored per day of week. Saturday and Sunday always count as closed,
//! whatever a building record says about them.

use chrono::{DateTime, Datelike, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::{resolve, TimeOfDay};

/// Operating window of one building on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DailyHours {
    Open {
        opens_at: TimeOfDay,
        closes_at: TimeOfDay,
    },
    Closed,
}

impl DailyHours {
    /// Build an open window.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` unless `closes_at` is strictly after
    /// `opens_at`.
    pub fn open(opens_at: TimeOfDay, closes_at: TimeOfDay) -> Result<Self> {
        if closes_at <= opens_at {
            return Err(EngineError::InvalidInterval {
                start: opens_at.to_string(),
                end: closes_at.to_string(),
            });
        }
        Ok(Self::Open {
            opens_at,
            closes_at,
        })
    }

    /// The `(opens_at, closes_at)` pair, or `None` when closed.
    pub fn window(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match *self {
            Self::Open {
                opens_at,
                closes_at,
            } => Some((opens_at, closes_at)),
            Self::Closed => None,
        }
    }
}

/// Per-day-of-week hours for one building. A missing day means no hours were
/// recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<DailyHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DailyHours>,
}

impl WeeklyHours {
    /// The same window Monday through Friday, nothing recorded for the weekend.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` unless `closes_at` follows `opens_at`.
    pub fn weekdays(opens_at: TimeOfDay, closes_at: TimeOfDay) -> Result<Self> {
        let day = DailyHours::open(opens_at, closes_at)?;
        Ok(Self {
            monday: Some(day),
            tuesday: Some(day),
            wednesday: Some(day),
            thursday: Some(day),
            friday: Some(day),
            ..Self::default()
        })
    }

    /// Replace the hours recorded for `day`.
    pub fn with_day(mut self, day: Weekday, hours: DailyHours) -> Self {
        *self.slot_mut(day) = Some(hours);
        self
    }

    /// The hours stored for `day`, exactly as recorded.
    pub fn stored(&self, day: Weekday) -> Option<&DailyHours> {
        match day {
            Weekday::Sun => self.sunday.as_ref(),
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
        }
    }

    /// The hours in effect on `day`: `None` on weekends regardless of what is stored.
    pub fn hours_on(&self, day: Weekday) -> Option<&DailyHours> {
        if is_weekend(day) {
            None
        } else {
            self.stored(day)
        }
    }

    fn slot_mut(&mut self, day: Weekday) -> &mut Option<DailyHours> {
        match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        }
    }
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Outcome of checking a building's hours against a reference instant.
///
/// Both bounds are carried whether or not the building is open, so callers can
/// tell "not open yet" (bounds present, `at` before `opens_at`) from "no hours
/// recorded" (bounds absent).
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingGate<Tz: TimeZone> {
    pub is_open: bool,
    pub opens_at: Option<DateTime<Tz>>,
    pub closes_at: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> BuildingGate<Tz> {
    fn closed() -> Self {
        Self {
            is_open: false,
            opens_at: None,
            closes_at: None,
        }
    }
}

/// Decide whether the building is open at `at`.
///
/// Weekends, `DailyHours::Closed`, and missing hours all yield a closed gate with
/// no bounds. Otherwise the building is open when `opens_at <= at <= closes_at`.
pub fn evaluate<Tz: TimeZone>(hours: Option<&DailyHours>, at: &DateTime<Tz>) -> BuildingGate<Tz> {
    if is_weekend(at.weekday()) {
        return BuildingGate::closed();
    }

    let Some((opens, closes)) = hours.and_then(DailyHours::window) else {
        return BuildingGate::closed();
    };

    let opens_at = resolve(opens, at);
    let closes_at = resolve(closes, at);
    let is_open = opens_at <= *at && *at <= closes_at;

    BuildingGate {
        is_open,
        opens_at: Some(opens_at),
        closes_at: Some(closes_at),
    }
}
