//! Consecutive-day streaks over water and workout logs.

use crate::{WaterLog, WorkoutLog};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Days in a row the water goal was met, walking back from the latest log
///
/// Only logs dated on or before `as_of` are considered. The newest of those
/// starts the streak with no date constraint; each following log must be
/// dated exactly one day before the previously counted one and meet `goal`.
pub fn water_streak(logs: &[WaterLog], goal: u32, as_of: NaiveDate) -> u32 {
    let mut dated: Vec<&WaterLog> = logs.iter().filter(|l| l.date <= as_of).collect();
    dated.sort_by(|a, b| b.date.cmp(&a.date));

    let mut streak = 0;
    let mut previous: Option<NaiveDate> = None;
    for log in dated {
        if let Some(prev) = previous {
            if prev - log.date != Duration::days(1) {
                break;
            }
        }
        if log.glasses < goal {
            break;
        }
        streak += 1;
        previous = Some(log.date);
    }
    streak
}

/// Days in a row with at least one workout, ending today or yesterday
///
/// A day without a workout today does not break the streak yet; counting
/// then starts from yesterday.
pub fn workout_streak(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = logs.iter().map(|l| l.date).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Intensity;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn water(day: &str, glasses: u32) -> WaterLog {
        WaterLog {
            id: Uuid::new_v4(),
            date: date(day),
            glasses,
        }
    }

    fn workout(day: &str) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            date: date(day),
            workout_type: "Cycling".into(),
            duration: 30,
            calories_burned: 250,
            intensity: Intensity::Medium,
            notes: String::new(),
        }
    }

    #[test]
    fn test_water_streak_stops_at_shortfall() {
        let logs = vec![
            water("2024-01-01", 8),
            water("2024-01-02", 8),
            water("2024-01-03", 8),
            water("2024-01-04", 2),
        ];
        assert_eq!(water_streak(&logs, 8, date("2024-01-04")), 0);
        assert_eq!(water_streak(&logs, 8, date("2024-01-03")), 3);
    }

    #[test]
    fn test_water_streak_stops_at_gap() {
        // Insertion order must not matter.
        let logs = vec![
            water("2024-01-05", 9),
            water("2024-01-01", 8),
            water("2024-01-06", 8),
            water("2024-01-02", 8),
        ];
        assert_eq!(water_streak(&logs, 8, date("2024-01-06")), 2);
    }

    #[test]
    fn test_water_streak_latest_log_need_not_be_today() {
        let logs = vec![water("2024-01-01", 8), water("2024-01-02", 8)];
        assert_eq!(water_streak(&logs, 8, date("2024-01-10")), 2);
    }

    #[test]
    fn test_water_streak_empty() {
        assert_eq!(water_streak(&[], 8, date("2024-01-01")), 0);
    }

    #[test]
    fn test_workout_streak_from_today() {
        let logs = vec![
            workout("2024-03-01"),
            workout("2024-03-02"),
            workout("2024-03-02"),
            workout("2024-03-03"),
        ];
        assert_eq!(workout_streak(&logs, date("2024-03-03")), 3);
    }

    #[test]
    fn test_workout_streak_from_yesterday() {
        let logs = vec![workout("2024-02-28"), workout("2024-02-29")];
        assert_eq!(workout_streak(&logs, date("2024-03-01")), 2);
    }

    #[test]
    fn test_workout_streak_broken() {
        let logs = vec![workout("2024-03-01")];
        assert_eq!(workout_streak(&logs, date("2024-03-03")), 0);
    }
}
