//! `studyspot` CLI — check whether classrooms are free to study in.
//!
//! ## Usage
//!
//! ```sh
//! # Verdict for one room (stdin → pretty JSON on stdout)
//! cat room.json | studyspot assess --at 2026-03-16T09:30:00-07:00
//!
//! # One line per room across a campus
//! studyspot campus -i campus.json --timezone America/Los_Angeles
//!
//! # Only rooms that are free right now
//! studyspot campus -i campus.json --available-only
//!
//! # Fill in missing building hours from the class schedule
//! studyspot campus -i campus.json --derive-hours
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see each classification.

use std::collections::HashMap;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use studyspot_engine::rooms::{assess_room_with_policy, derive_weekly_hours, Meeting};
use studyspot_engine::{assess_rooms, AvailabilityPolicy, Room, RoomStatus, ScheduleRow, WeeklyHours};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "studyspot",
    version,
    about = "Find classrooms free for studying"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the availability verdict for one room as JSON
    Assess {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print one status line per room
    Campus {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Only list rooms that are open now
        #[arg(long)]
        available_only: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<String>,
    /// IANA time zone the schedule times are written in
    #[arg(long, default_value = "America/Los_Angeles")]
    timezone: String,
    /// Shortest free gap worth reporting, in minutes
    #[arg(long, default_value_t = studyspot_engine::MIN_USABLE_MINUTES)]
    min_usable_minutes: i64,
    /// A free room whose next class starts sooner than this is LIMITED
    #[arg(long, default_value_t = studyspot_engine::status::LIMITED_THRESHOLD_MINUTES)]
    limited_threshold_minutes: i64,
    /// Derive missing building hours from the weekday class schedule
    #[arg(long)]
    derive_hours: bool,
}

impl EngineArgs {
    fn policy(&self) -> AvailabilityPolicy {
        AvailabilityPolicy {
            min_usable_minutes: self.min_usable_minutes,
            limited_threshold_minutes: self.limited_threshold_minutes,
        }
    }

    fn reference_instant(&self) -> Result<DateTime<Tz>> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", self.timezone, e))?;

        let at = match &self.at {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid --at instant: {}", raw))?
                .with_timezone(&tz),
            None => Utc::now().with_timezone(&tz),
        };
        Ok(at)
    }
}

/// Input for `assess`: one room's building hours and weekly schedule.
#[derive(Deserialize)]
struct RoomInput {
    #[serde(default)]
    hours: Option<WeeklyHours>,
    #[serde(default)]
    schedule: Vec<ScheduleRow>,
    #[serde(default)]
    meetings: Vec<Meeting>,
}

/// Input for `campus`: hours keyed by building code, plus every room.
#[derive(Deserialize)]
struct CampusInput {
    #[serde(default)]
    buildings: HashMap<String, WeeklyHours>,
    rooms: Vec<Room>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess { input, engine } => {
            let raw = read_input(input.as_deref())?;
            let room: RoomInput = serde_json::from_str(&raw).context("Failed to parse room JSON")?;
            let at = engine.reference_instant()?;

            let mut rows = room.schedule;
            for meeting in &room.meetings {
                rows.extend(meeting.to_rows().context("Failed to expand meeting")?);
            }

            let hours = match room.hours {
                Some(hours) => Some(hours),
                None if engine.derive_hours => Some(
                    derive_weekly_hours(&rows).context("Failed to derive building hours")?,
                ),
                None => None,
            };

            debug!(rows = rows.len(), at = %at, "assessing room");
            let verdict = assess_room_with_policy(&engine.policy(), hours.as_ref(), &rows, &at)
                .context("Failed to assess room")?;

            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Campus {
            input,
            available_only,
            engine,
        } => {
            let raw = read_input(input.as_deref())?;
            let mut campus: CampusInput =
                serde_json::from_str(&raw).context("Failed to parse campus JSON")?;
            let at = engine.reference_instant()?;

            if engine.derive_hours {
                fill_missing_hours(&mut campus);
            }

            info!(
                rooms = campus.rooms.len(),
                buildings = campus.buildings.len(),
                at = %at,
                "assessing campus"
            );

            let results = assess_rooms(&engine.policy(), &campus.rooms, &campus.buildings, &at);
            for result in results {
                match result.verdict {
                    Ok(v) if available_only && v.status != RoomStatus::Open => {}
                    Ok(v) => println!("{:<12} {:<8} {}", result.location, v.status, v.status_text),
                    Err(_) if available_only => {}
                    Err(e) => println!("{:<12} {:<8} {}", result.location, "ERROR", e),
                }
            }
        }
    }

    Ok(())
}

/// Derive hours for every building that has none, from its rooms' rows.
///
/// Rows that do not parse are left out of the derivation; the rooms they belong to
/// still report their own errors when assessed. A building whose hours cannot be
/// derived stays without hours.
fn fill_missing_hours(campus: &mut CampusInput) {
    let mut rows_by_building: HashMap<&str, Vec<ScheduleRow>> = HashMap::new();
    for room in &campus.rooms {
        if campus.buildings.contains_key(&room.building) {
            continue;
        }
        let rows = match room.rows() {
            Ok(rows) => rows,
            Err(e) => {
                warn!(room = %room.id, error = %e, "skipping room when deriving hours");
                continue;
            }
        };
        rows_by_building
            .entry(room.building.as_str())
            .or_default()
            .extend(rows.into_iter().filter(|row| row.to_block().is_ok()));
    }

    let mut derived = Vec::new();
    for (building, rows) in rows_by_building {
        match derive_weekly_hours(&rows) {
            Ok(hours) => derived.push((building.to_string(), hours)),
            Err(e) => warn!(building, error = %e, "could not derive building hours"),
        }
    }
    campus.buildings.extend(derived);
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
