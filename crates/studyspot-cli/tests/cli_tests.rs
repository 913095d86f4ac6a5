//! Integration tests for the `studyspot` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the assess and
//! campus subcommands through the actual binary, including stdin piping, file
//! input, error handling, and the policy/time zone flags.

// Newer assert_cmd releases deprecate `Command::cargo_bin`; every test here
// still locates the `studyspot` binary through it.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Monday 2026-03-16, 09:30 in Los Angeles.
const MONDAY_0930: &str = "2026-03-16T09:30:00-07:00";

/// Helper: path to the room.json fixture.
fn room_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/room.json")
}

/// Helper: path to the campus.json fixture.
fn campus_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/campus.json")
}

/// Helper: read the room.json fixture as a string.
fn room_json() -> String {
    std::fs::read_to_string(room_json_path()).expect("room.json fixture must exist")
}

/// Helper: run `assess` on the room fixture and parse the JSON output.
fn assess_room_at(at: &str) -> serde_json::Value {
    let output = Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "-i", room_json_path(), "--at", at])
        .output()
        .expect("assess should run");
    assert!(output.status.success(), "assess failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("assess output must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Assess subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn assess_in_use_room_from_file() {
    let verdict = assess_room_at(MONDAY_0930);

    assert_eq!(verdict["status"], "IN_USE");
    assert_eq!(verdict["is_available"], false);
    assert_eq!(verdict["is_building_open"], true);
    assert_eq!(verdict["next_transition_at"], "2026-03-16T10:15:00-07:00");
    assert_eq!(verdict["status_text"], "Free at 10:15 AM for 11h 45m");
}

#[test]
fn assess_open_room_before_class() {
    let verdict = assess_room_at("2026-03-16T08:00:00-07:00");

    assert_eq!(verdict["status"], "OPEN");
    assert_eq!(verdict["is_available"], true);
    assert_eq!(verdict["minutes_until_next_occupancy"], 60);
    assert_eq!(verdict["status_text"], "Free until 9:00 AM (1h 0m)");
}

#[test]
fn assess_weekend_ignores_stored_saturday_hours() {
    let verdict = assess_room_at("2026-03-21T12:00:00-07:00");

    assert_eq!(verdict["status"], "CLOSED");
    assert_eq!(verdict["status_text"], "Closed on weekends");
}

#[test]
fn assess_converts_instant_into_schedule_timezone() {
    // 16:30Z is 09:30 in Los Angeles.
    let verdict = assess_room_at("2026-03-16T16:30:00Z");

    assert_eq!(verdict["status"], "IN_USE");
    assert_eq!(verdict["next_transition_at"], "2026-03-16T10:15:00-07:00");
}

#[test]
fn assess_reads_stdin() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "--at", MONDAY_0930])
        .write_stdin(room_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"IN_USE\""));
}

#[test]
fn assess_policy_flags_change_classification() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args([
            "assess",
            "-i",
            room_json_path(),
            "--at",
            "2026-03-16T08:00:00-07:00",
            "--limited-threshold-minutes",
            "90",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"LIMITED\""));
}

#[test]
fn assess_derives_hours_when_missing() {
    let input = r#"{
        "schedule": [
            {"day_of_week": 1, "start_time": "09:00", "end_time": "10:15"},
            {"day_of_week": 2, "start_time": "13:00", "end_time": "18:00"}
        ]
    }"#;

    // Without derivation there are no hours at all.
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "--at", "2026-03-16T11:00:00-07:00"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No classes today"));

    // Derived weekday hours are 09:00-18:00.
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "--derive-hours", "--at", "2026-03-16T11:00:00-07:00"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Free until 6:00 PM (7h 0m)"));
}

#[test]
fn assess_malformed_row_fails() {
    let input = r#"{
        "hours": {"monday": {"state": "open", "opens_at": "08:00", "closes_at": "22:00"}},
        "schedule": [{"day_of_week": 1, "start_time": "9am", "end_time": "10:15"}]
    }"#;

    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "--at", MONDAY_0930])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed time of day"));
}

#[test]
fn assess_invalid_json_fails() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "--at", MONDAY_0930])
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse room JSON"));
}

#[test]
fn assess_invalid_timezone_fails() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "-i", room_json_path(), "--timezone", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn assess_invalid_instant_fails() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "-i", room_json_path(), "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --at instant"));
}

#[test]
fn assess_missing_file_fails() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["assess", "-i", "/nonexistent/room.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Campus subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn campus_prints_one_line_per_room() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["campus", "-i", campus_json_path(), "--at", MONDAY_0930])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"ECS-413\s+IN_USE\s+Free at 10:15 AM for 11h 45m").unwrap())
        .stdout(predicate::str::is_match(r"ECS-308\s+OPEN\s+Free until 12:00 PM \(2h 30m\)").unwrap())
        .stdout(predicate::str::is_match(r"ECS-101\s+CLOSED\s+No classes today").unwrap())
        .stdout(predicate::str::is_match(r"VEC-110\s+ERROR\s+Malformed time of day").unwrap())
        .stdout(predicate::str::is_match(r"LA1-201\s+CLOSED\s+No classes today").unwrap());
}

#[test]
fn campus_keeps_input_order() {
    let output = Command::cargo_bin("studyspot")
        .unwrap()
        .args(["campus", "-i", campus_json_path(), "--at", MONDAY_0930])
        .output()
        .expect("campus should run");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let locations: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(locations, ["ECS-413", "ECS-308", "ECS-101", "VEC-110", "LA1-201"]);
}

#[test]
fn campus_available_only_filters() {
    Command::cargo_bin("studyspot")
        .unwrap()
        .args([
            "campus",
            "-i",
            campus_json_path(),
            "--at",
            MONDAY_0930,
            "--available-only",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ECS-308"))
        .stdout(predicate::str::contains("ECS-413").not())
        .stdout(predicate::str::contains("VEC-110").not());
}

#[test]
fn campus_derive_hours_fills_missing_buildings() {
    // LA1 has no stored hours; its only classes run 08:00-08:50.
    Command::cargo_bin("studyspot")
        .unwrap()
        .args([
            "campus",
            "-i",
            campus_json_path(),
            "--at",
            MONDAY_0930,
            "--derive-hours",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"LA1-201\s+CLOSED\s+Building closed").unwrap());
}

#[test]
fn campus_derive_hours_survives_corrupt_rows() {
    // No stored hours. LA1-202 has a corrupt Wednesday row and LA1-203 a corrupt
    // Monday row; LA1-201 alone decides the derived hours.
    let input = r#"{
        "rooms": [
            {
                "id": "la1-201", "building": "LA1", "room_number": "201",
                "schedule": [{"day_of_week": 1, "start_time": "08:00", "end_time": "12:00"}]
            },
            {
                "id": "la1-202", "building": "LA1", "room_number": "202",
                "schedule": [
                    {"day_of_week": 1, "start_time": "13:00", "end_time": "14:00"},
                    {"day_of_week": 3, "start_time": "9am", "end_time": "23:00"}
                ]
            },
            {
                "id": "la1-203", "building": "LA1", "room_number": "203",
                "schedule": [{"day_of_week": 1, "start_time": "7am", "end_time": "10:00"}]
            }
        ]
    }"#;

    Command::cargo_bin("studyspot")
        .unwrap()
        .args(["campus", "--derive-hours", "--at", MONDAY_0930])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"LA1-201\s+IN_USE").unwrap())
        .stdout(
            predicate::str::is_match(r"LA1-202\s+OPEN\s+Free until 1:00 PM \(3h 30m\)").unwrap(),
        )
        .stdout(predicate::str::is_match(r"LA1-203\s+ERROR\s+Malformed time of day").unwrap());
}
