//! Status strings for presentation layers.
//!
//! Output is fixed-locale: 12-hour clock, `AM`/`PM`, zero-padded minutes, hour
//! without padding. Other tooling diffs these strings, so changes here are
//! user-visible.

use chrono::{TimeZone, Timelike};

use crate::freebusy::UsableWindow;
use crate::status::{Assessment, ClosedReason};

/// Render a clock time such as `9:00 AM` or `12:30 PM`.
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Render a duration: `2h 15m`, `45m`, or `2h` when exactly on the hour.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Render remaining free time: like [`format_duration`] but always shows both
/// units once an hour is reached (`1h 0m`).
pub fn format_remaining(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    if hours == 0 {
        format!("{}m", rest)
    } else {
        format!("{}h {}m", hours, rest)
    }
}

fn window_text<Tz: TimeZone>(window: Option<&UsableWindow<Tz>>) -> String {
    match window {
        Some(w) => format!(
            "Free at {} for {}",
            format_clock(&w.starts_at),
            format_duration(w.duration_minutes)
        ),
        None => "Busy all day".to_string(),
    }
}

/// The human-readable status line for an assessment.
pub fn status_text<Tz: TimeZone>(assessment: &Assessment<Tz>) -> String {
    match assessment {
        Assessment::Closed { reason, .. } => match reason {
            ClosedReason::Weekend => "Closed on weekends".to_string(),
            ClosedReason::NoHours | ClosedReason::NoClasses => "No classes today".to_string(),
            ClosedReason::NotYetOpen { opens_at } => format!("Opens at {}", format_clock(opens_at)),
            ClosedReason::AfterHours => "Building closed".to_string(),
        },
        Assessment::InUse { next_window, .. } | Assessment::Limited { next_window, .. } => {
            window_text(next_window.as_ref())
        }
        Assessment::Open {
            free_until,
            free_minutes,
            ..
        } => format!(
            "Free until {} ({})",
            format_clock(free_until),
            format_remaining(*free_minutes)
        ),
    }
}
