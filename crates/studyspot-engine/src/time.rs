//! Wall-clock times of day and their resolution to absolute instants.
//!
//! Building hours and class blocks are stored as bare times of day (`"09:00:00"`).
//! Every comparison the engine makes happens between absolute instants, so each
//! stored time is anchored to the calendar date of the caller's reference instant,
//! in the reference instant's own time zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound on how far a local time inside a DST gap is pushed forward.
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// A wall-clock time of day with whole-second precision.
///
/// Serializes as `HH:MM:SS`. Deserialization accepts `HH:MM` or `HH:MM:SS` and
/// fails with the [`EngineError::MalformedTime`] message otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build a time of day from its components.
    ///
    /// # Errors
    /// Returns `EngineError::MalformedTime` if any component is out of range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| {
                EngineError::MalformedTime(format!("{:02}:{:02}:{:02}", hour, minute, second))
            })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || EngineError::MalformedTime(s.to_string());

        let parts: Vec<&str> = s.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(malformed());
        }

        // Digits only: `u32::from_str` would otherwise accept a leading '+'.
        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            *slot = part.parse().map_err(|_| malformed())?;
        }

        let [hour, minute, second] = fields;
        if hour > 23 || minute > 59 || second > 59 {
            return Err(malformed());
        }

        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(malformed)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Anchor a time of day to the calendar date of `reference`.
///
/// The result shares the reference's year, month, day and time zone, carries the
/// given hour/minute/second, and has a zero sub-second component.
///
/// Local times that do not map to exactly one instant are settled as follows:
/// an ambiguous time (DST fall-back) takes the earlier instant, and a time inside
/// a DST gap (spring-forward) moves to the first wall-clock minute after the gap.
pub fn resolve<Tz: TimeZone>(time: TimeOfDay, reference: &DateTime<Tz>) -> DateTime<Tz> {
    let local = reference.date_naive().and_time(time.0);
    resolve_local(&reference.timezone(), local)
}

/// Parse `time` and anchor it to the date of `reference`.
///
/// # Errors
/// Returns `EngineError::MalformedTime` if `time` is not `HH:MM` or `HH:MM:SS`.
pub fn resolve_str<Tz: TimeZone>(time: &str, reference: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    Ok(resolve(time.parse()?, reference))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = local;
            for _ in 0..MAX_GAP_MINUTES {
                probe += Duration::minutes(1);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
            tz.from_utc_datetime(&local)
        }
    }
}

/// Whole minutes from `from` to `to`, truncated toward zero. Negative when `to`
/// precedes `from`.
pub fn minutes_between<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> i64 {
    to.clone()
        .signed_duration_since(from.clone())
        .num_minutes()
}

