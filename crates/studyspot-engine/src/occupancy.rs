//! Schedule blocks and the scan for the current and next occupancy of a room.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::{resolve, TimeOfDay};

/// One recurring weekly class meeting in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    /// Optional label, usually the course code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ScheduleBlock {
    /// Build a block, rejecting intervals whose end does not follow the start.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` if `end_time <= start_time`.
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Result<Self> {
        if end_time <= start_time {
            return Err(EngineError::InvalidInterval {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }
        Ok(Self {
            start_time,
            end_time,
            label: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True for zero- or negative-length blocks that slipped past validation.
    pub fn is_degenerate(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Anchor this block to the date of `at`.
    pub fn resolve<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> ResolvedBlock<'_, Tz> {
        ResolvedBlock {
            block: self,
            start: resolve(self.start_time, at),
            end: resolve(self.end_time, at),
        }
    }
}

/// A schedule block anchored to a concrete day.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock<'a, Tz: TimeZone> {
    pub block: &'a ScheduleBlock,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// What a room is doing at a reference instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy<'a, Tz: TimeZone> {
    /// The block in progress (`start <= at < end`).
    pub current: Option<ResolvedBlock<'a, Tz>>,
    /// The block with the earliest start strictly after `at`.
    pub next: Option<ResolvedBlock<'a, Tz>>,
}

/// Find the block occupying `at` and the nearest block starting after it.
///
/// Blocks may arrive in any order and may overlap. When several blocks contain
/// `at`, the first one in input order is reported as current. Among future blocks
/// sharing the earliest start, the first one in input order wins.
pub fn scan<'a, Tz: TimeZone>(blocks: &'a [ScheduleBlock], at: &DateTime<Tz>) -> Occupancy<'a, Tz> {
    let mut current: Option<ResolvedBlock<'a, Tz>> = None;
    let mut next: Option<ResolvedBlock<'a, Tz>> = None;

    for block in blocks {
        let resolved = block.resolve(at);

        if resolved.start <= *at && *at < resolved.end {
            if current.is_none() {
                current = Some(resolved);
            }
            continue;
        }

        if resolved.start > *at && next.as_ref().is_none_or(|n| resolved.start < n.start) {
            next = Some(resolved);
        }
    }

    Occupancy { current, next }
}
