//! # studyspot-engine
//!
//! Deterministic room availability for finding unscheduled study spaces.
//!
//! Given a building's hours for a day, the class blocks scheduled in one of its
//! rooms, and a reference instant, the engine produces a single verdict: whether
//! the room is usable right now, when that changes next, and a one-line status
//! string. Every entry point takes the reference instant explicitly; nothing reads
//! the clock and nothing is cached between calls.
//!
//! ## Modules
//!
//! - [`time`] — time-of-day parsing and anchoring to a calendar date
//! - [`hours`] — building hours and the open/closed gate
//! - [`occupancy`] — schedule blocks; current and next class in a room
//! - [`freebusy`] — forward sweep for the next usable free window
//! - [`status`] — four-state classification
//! - [`format`] — clock, duration, and status-line rendering
//! - [`verdict`] — flat verdict for presentation layers
//! - [`rooms`] — stored schedule rows, weekly hours, batch assessment
//! - [`error`] — Error types

pub mod error;
pub mod format;
pub mod freebusy;
pub mod hours;
pub mod occupancy;
pub mod rooms;
pub mod status;
pub mod time;
pub mod verdict;

pub use error::EngineError;
pub use freebusy::{find_next_usable_window, UsableWindow, MIN_USABLE_MINUTES};
pub use hours::{DailyHours, WeeklyHours};
pub use occupancy::{scan, ScheduleBlock};
pub use rooms::{assess_room, assess_rooms, Room, ScheduleRow};
pub use status::{classify, Assessment, AvailabilityPolicy, RoomStatus};
pub use time::TimeOfDay;
pub use verdict::{verdict, AvailabilityVerdict};
