//! Error types for studyspot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A time-of-day string did not parse as `HH:MM` or `HH:MM:SS`.
    #[error("Malformed time of day: {0:?}")]
    MalformedTime(String),

    /// An hours pair or schedule block whose end is not strictly after its start.
    #[error("Invalid interval: end {end} is not after start {start}")]
    InvalidInterval { start: String, end: String },

    /// A meeting-days pattern contained an unknown day abbreviation.
    #[error("Invalid meeting days: {0:?}")]
    InvalidDays(String),

    /// A catalog time range such as `2:30-3:45PM` did not parse.
    #[error("Malformed time range: {0:?}")]
    MalformedTimeRange(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
