//! Corruption recovery tests for the on-disk record store.
//!
//! These tests verify the tracker keeps working with:
//! - Corrupted profile documents
//! - Malformed or torn JSON lines
//! - Missing files
//! - Data surviving a reopen

use chrono::NaiveDate;
use fittrack_core::{Config, FitnessTracker, JsonlStore, NewFood, RecordStore};
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn open(dir: &TempDir) -> FitnessTracker<JsonlStore> {
    let store = JsonlStore::open(dir.path()).expect("Failed to open store");
    FitnessTracker::new(store).with_today(date("2024-03-01"))
}

fn food(name: &str, calories: i64) -> NewFood {
    NewFood {
        name: name.into(),
        calories,
        ..Default::default()
    }
}

#[test]
fn test_records_survive_reopen() {
    let temp_dir = setup_test_dir();
    {
        let mut t = open(&temp_dir);
        t.log_steps(10_200, date("2024-03-01")).unwrap();
        t.log_food(food("Apple", 95), date("2024-03-01")).unwrap();
        t.add_friend("Riley").unwrap();
    }

    let t = open(&temp_dir);
    assert_eq!(t.daily_steps(date("2024-03-01")).unwrap(), 10_200);
    assert_eq!(t.calories_consumed(date("2024-03-01")).unwrap(), 95);
    assert_eq!(t.friends().unwrap().len(), 1);

    let profile = t.profile().unwrap();
    assert!(profile.has_achievement("steps-10k"));
    assert_eq!(profile.points, 50);
}

#[test]
fn test_corrupted_profile_falls_back_to_defaults() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("profile.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted profile");

    let mut t = open(&temp_dir);
    let profile = t.profile().unwrap();
    assert_eq!(profile.daily_water_goal, 8);
    assert_eq!(profile.points, 0);

    // The next unlock overwrites the bad document with a valid one.
    t.log_steps(10_000, date("2024-03-01")).unwrap();
    assert!(t.store().profile().unwrap().is_some());
}

#[test]
fn test_malformed_lines_do_not_block_other_aggregates() {
    let temp_dir = setup_test_dir();
    let mut t = open(&temp_dir);
    t.log_food(food("Rice", 200), date("2024-03-01")).unwrap();

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(temp_dir.path().join("food.jsonl"))
        .unwrap();
    writeln!(file, "{{ not a food log }}").unwrap();
    drop(file);

    fs::write(temp_dir.path().join("workouts.jsonl"), "garbage\n").unwrap();

    t.log_food(food("Beans", 150), date("2024-03-01")).unwrap();
    assert_eq!(t.calories_consumed(date("2024-03-01")).unwrap(), 350);
    assert_eq!(t.calories_burned(date("2024-03-01")).unwrap(), 0);
}

#[test]
fn test_torn_last_line_keeps_next_append() {
    let temp_dir = setup_test_dir();
    let mut t = open(&temp_dir);
    t.log_food(food("Toast", 120), date("2024-03-01")).unwrap();

    // Simulate a crash halfway through writing a line.
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(temp_dir.path().join("food.jsonl"))
        .unwrap();
    write!(file, r#"{{"id":"00000000-0000-0000-0000-0000"#).unwrap();
    drop(file);

    t.log_food(food("Jam", 50), date("2024-03-01")).unwrap();
    let names: Vec<_> = t
        .food_logs_on(date("2024-03-01"))
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["Toast", "Jam"]);
}

#[test]
fn test_missing_files_read_as_empty() {
    let temp_dir = setup_test_dir();
    let t = open(&temp_dir);

    assert_eq!(t.water_streak().unwrap(), 0);
    assert!(t.workout_plan().unwrap().is_none());
    assert!(t.challenges().unwrap().is_empty());
    assert_eq!(t.leaderboard().unwrap().len(), 1);
}

#[test]
fn test_store_from_config_uses_data_dir() {
    let temp_dir = setup_test_dir();
    let mut config = Config::default();
    config.data.data_dir = temp_dir.path().join("nested").join("data");
    config.profile.daily_step_goal = 8_000;

    let store = JsonlStore::from_config(&config).unwrap();
    assert!(store.dir().exists());

    let t = FitnessTracker::from_config(store, &config);
    assert_eq!(t.profile().unwrap().daily_step_goal, 8_000);
}
