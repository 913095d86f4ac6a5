//! Find the next free window long enough to be worth walking to.
//!
//! Resolves the day's blocks, drops the ones already over, sorts the rest by start
//! time, then sweeps a cursor forward looking for the first gap of at least the
//! minimum usable length before the building closes.

use chrono::{DateTime, TimeZone};

use crate::occupancy::ScheduleBlock;
use crate::time::minutes_between;

/// Shortest free interval considered usable for studying, in minutes.
pub const MIN_USABLE_MINUTES: i64 = 30;

/// A free interval of at least the minimum usable length.
#[derive(Debug, Clone, PartialEq)]
pub struct UsableWindow<Tz: TimeZone> {
    pub starts_at: DateTime<Tz>,
    /// Whole minutes until the next block starts or the building closes.
    pub duration_minutes: i64,
}

/// Blocks overlapping `[from, until)`, as `(start, end)` sorted by start time.
fn busy_intervals<Tz: TimeZone>(
    blocks: &[ScheduleBlock],
    from: &DateTime<Tz>,
    until: &DateTime<Tz>,
) -> Vec<(DateTime<Tz>, DateTime<Tz>)> {
    let mut intervals: Vec<(DateTime<Tz>, DateTime<Tz>)> = blocks
        .iter()
        .map(|b| {
            let resolved = b.resolve(from);
            (resolved.start, resolved.end)
        })
        .filter(|(start, end)| end > from && start < until)
        .collect();

    // Sort by start time (then by end time for stability).
    intervals.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    intervals
}

/// Find the first free window of at least `min_usable_minutes` starting at or
/// after `from` and ending no later than `day_closes_at`.
///
/// Blocks starting at or after closing time are ignored, so a window never runs
/// past `day_closes_at`. Overlapping blocks are absorbed: the cursor only ever
/// moves forward, so a block starting before the cursor yields a negative gap and
/// is skipped over. Returns `None` when the room stays busy (or only has short
/// gaps) until closing.
pub fn find_next_usable_window<Tz: TimeZone>(
    blocks: &[ScheduleBlock],
    from: &DateTime<Tz>,
    day_closes_at: &DateTime<Tz>,
    min_usable_minutes: i64,
) -> Option<UsableWindow<Tz>> {
    let mut cursor = from.clone();

    for (busy_start, busy_end) in busy_intervals(blocks, from, day_closes_at) {
        let gap = minutes_between(&cursor, &busy_start);
        if gap >= min_usable_minutes {
            return Some(UsableWindow {
                starts_at: cursor,
                duration_minutes: gap,
            });
        }
        if busy_end > cursor {
            cursor = busy_end;
        }
    }

    // Trailing window between the last block and closing time.
    let gap = minutes_between(&cursor, day_closes_at);
    (gap >= min_usable_minutes).then(|| UsableWindow {
        starts_at: cursor,
        duration_minutes: gap,
    })
}
