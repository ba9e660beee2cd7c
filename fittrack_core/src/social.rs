//! Challenges, friends and leaderboards.

use crate::aggregate::{self, DateRange};
use crate::{
    Challenge, ChallengeType, Friend, FriendStats, StepLog, Visibility, WorkoutLog,
};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name the local user is listed under on leaderboards
pub const LOCAL_DISPLAY_NAME: &str = "You";

/// Rows top-performer lists are padded up to
pub const MIN_PERFORMERS: usize = 5;

/// Days an example community challenge runs for
pub const EXAMPLE_CHALLENGE_DAYS: i64 = 14;

// ============================================================================
// Challenge Progress
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChallengeProgress {
    pub current: u64,
    pub goal: u32,
    pub percent: u8,
    pub unit: &'static str,
}

/// Progress of the local user's logs inside the challenge window
pub fn challenge_progress(
    challenge: &Challenge,
    steps: &[StepLog],
    workouts: &[WorkoutLog],
) -> ChallengeProgress {
    let window = DateRange::new(challenge.start_date, challenge.end_date);
    let current = match challenge.challenge_type {
        ChallengeType::Steps => aggregate::steps_between(steps, window),
        ChallengeType::Calories => aggregate::calories_burned_between(workouts, window),
        ChallengeType::Workouts => aggregate::workouts_between(workouts, window),
        ChallengeType::Minutes => aggregate::workout_minutes_between(workouts, window),
    };
    ChallengeProgress {
        current,
        goal: challenge.goal,
        percent: aggregate::percent_of_goal(current as f64, f64::from(challenge.goal)),
        unit: challenge.challenge_type.unit_label(),
    }
}

/// Challenges the local user has joined that are running today
pub fn active_challenges(challenges: &[Challenge], today: NaiveDate) -> Vec<Challenge> {
    challenges
        .iter()
        .filter(|c| c.is_active(today))
        .cloned()
        .collect()
}

/// Community challenges still open to the local user, optionally of one type
pub fn open_challenges(
    challenges: &[Challenge],
    today: NaiveDate,
    kind: Option<ChallengeType>,
) -> Vec<Challenge> {
    challenges
        .iter()
        .filter(|c| c.is_open_to_join(today))
        .filter(|c| kind.map_or(true, |k| c.challenge_type == k))
        .cloned()
        .collect()
}

/// Three community challenges starting today that the local user has not joined
pub fn example_challenges(today: NaiveDate) -> Vec<Challenge> {
    let end = today + Duration::days(EXAMPLE_CHALLENGE_DAYS);
    let make = |name: &str,
                description: &str,
                challenge_type: ChallengeType,
                goal: u32,
                participants: &[&str]| Challenge {
        id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        challenge_type,
        goal,
        start_date: today,
        end_date: end,
        visibility: Visibility::Community,
        participants: participants.iter().map(|p| p.to_string()).collect(),
        created_at: today,
    };

    vec![
        make(
            "10K Steps Challenge",
            "Complete 100,000 steps in two weeks!",
            ChallengeType::Steps,
            100_000,
            &["user1", "user2", "user3", "user4"],
        ),
        make(
            "Calorie Burn Challenge",
            "Burn 5,000 calories through workouts",
            ChallengeType::Calories,
            5_000,
            &["user1", "user2"],
        ),
        make(
            "Workout Streak",
            "Complete 12 workouts in two weeks",
            ChallengeType::Workouts,
            12,
            &["user1", "user3", "user5"],
        ),
    ]
}

// ============================================================================
// Friends and Leaderboards
// ============================================================================

/// Simulated display stats for a newly added friend
pub fn simulated_stats<R: Rng + ?Sized>(rng: &mut R) -> FriendStats {
    FriendStats {
        steps: rng.gen_range(0..12_000),
        calories: rng.gen_range(0..600),
        workouts: rng.gen_range(0..5),
    }
}

/// Case-insensitive name match against existing friends
pub fn is_duplicate_friend(friends: &[Friend], name: &str) -> bool {
    let name = name.trim();
    friends
        .iter()
        .any(|f| f.name.trim().to_lowercase() == name.to_lowercase())
}

/// Metric a ranking is sorted by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    Steps,
    Calories,
    Workouts,
}

impl std::str::FromStr for RankMetric {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "steps" => Ok(RankMetric::Steps),
            "calories" => Ok(RankMetric::Calories),
            "workouts" => Ok(RankMetric::Workouts),
            other => Err(crate::Error::validation(format!(
                "Unknown ranking metric: {}",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub steps: u64,
    pub calories: u64,
    pub workouts: u64,
    pub is_local_user: bool,
}

impl LeaderboardEntry {
    fn metric(&self, metric: RankMetric) -> u64 {
        match metric {
            RankMetric::Steps => self.steps,
            RankMetric::Calories => self.calories,
            RankMetric::Workouts => self.workouts,
        }
    }

    fn from_friend(friend: &Friend) -> Self {
        Self {
            name: friend.name.clone(),
            steps: u64::from(friend.stats.steps),
            calories: u64::from(friend.stats.calories),
            workouts: u64::from(friend.stats.workouts),
            is_local_user: false,
        }
    }
}

/// The local user's row: today's steps and burn, workouts this week
pub fn local_entry(steps: &[StepLog], workouts: &[WorkoutLog], today: NaiveDate) -> LeaderboardEntry {
    LeaderboardEntry {
        name: LOCAL_DISPLAY_NAME.into(),
        steps: aggregate::daily_steps(steps, today),
        calories: aggregate::calories_burned(workouts, today),
        workouts: aggregate::weekly_workouts(workouts, today).len() as u64,
        is_local_user: true,
    }
}

/// Local user plus every friend, most steps first
pub fn leaderboard(local: LeaderboardEntry, friends: &[Friend]) -> Vec<LeaderboardEntry> {
    ranked(local, friends, RankMetric::Steps, 0)
}

const EXAMPLE_PERFORMERS: [(&str, u64, u64, u64); 5] = [
    ("Alex", 12_547, 523, 4),
    ("Taylor", 9_856, 452, 3),
    ("Jordan", 15_234, 687, 5),
    ("Morgan", 8_761, 398, 2),
    ("Casey", 11_382, 512, 4),
];

/// Like [`leaderboard`], padded with example performers to five rows
pub fn top_performers(
    local: LeaderboardEntry,
    friends: &[Friend],
    metric: RankMetric,
) -> Vec<LeaderboardEntry> {
    ranked(local, friends, metric, MIN_PERFORMERS)
}

fn ranked(
    local: LeaderboardEntry,
    friends: &[Friend],
    metric: RankMetric,
    min_rows: usize,
) -> Vec<LeaderboardEntry> {
    let mut rows = vec![local];
    rows.extend(friends.iter().map(LeaderboardEntry::from_friend));

    let missing = min_rows.saturating_sub(rows.len());
    rows.extend(
        EXAMPLE_PERFORMERS
            .iter()
            .take(missing)
            .map(|&(name, steps, calories, workouts)| LeaderboardEntry {
                name: name.into(),
                steps,
                calories,
                workouts,
                is_local_user: false,
            }),
    );

    rows.sort_by(|a, b| b.metric(metric).cmp(&a.metric(metric)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Intensity, LOCAL_USER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn workout(day: &str, duration: u32, calories_burned: u32) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            date: date(day),
            workout_type: "Swimming".into(),
            duration,
            calories_burned,
            intensity: Intensity::High,
            notes: String::new(),
        }
    }

    fn friend(name: &str, steps: u32, calories: u32, workouts: u32) -> Friend {
        Friend {
            id: Uuid::new_v4(),
            name: name.into(),
            stats: FriendStats {
                steps,
                calories,
                workouts,
            },
        }
    }

    fn challenge(kind: ChallengeType, goal: u32) -> Challenge {
        Challenge {
            id: Uuid::new_v4(),
            name: "Test".into(),
            description: String::new(),
            challenge_type: kind,
            goal,
            start_date: date("2024-01-01"),
            end_date: date("2024-01-05"),
            visibility: Visibility::Private,
            participants: vec![LOCAL_USER.into()],
            created_at: date("2024-01-01"),
        }
    }

    #[test]
    fn test_challenge_progress_by_type() {
        let workouts = vec![
            workout("2024-01-01", 30, 200),
            workout("2024-01-05", 45, 300),
            workout("2024-01-10", 20, 100),
        ];

        let minutes = challenge_progress(&challenge(ChallengeType::Minutes, 100), &[], &workouts);
        assert_eq!((minutes.current, minutes.percent), (75, 75));
        assert_eq!(minutes.unit, "minutes");

        let count = challenge_progress(&challenge(ChallengeType::Workouts, 1), &[], &workouts);
        assert_eq!((count.current, count.percent), (2, 100));

        let burn = challenge_progress(&challenge(ChallengeType::Calories, 1000), &[], &workouts);
        assert_eq!((burn.current, burn.percent), (500, 50));
        assert_eq!(burn.unit, "cal burned");
    }

    #[test]
    fn test_open_challenges_filter() {
        let today = date("2024-06-01");
        let examples = example_challenges(today);
        assert_eq!(examples.len(), 3);
        assert!(examples.iter().all(|c| !c.has_local_user()));
        assert!(examples.iter().all(|c| c.end_date == date("2024-06-15")));

        assert_eq!(open_challenges(&examples, today, None).len(), 3);
        let steps = open_challenges(&examples, today, Some(ChallengeType::Steps));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].goal, 100_000);
        assert!(open_challenges(&examples, today, Some(ChallengeType::Minutes)).is_empty());
        assert!(open_challenges(&examples, date("2024-06-16"), None).is_empty());
    }

    #[test]
    fn test_simulated_stats_ranges() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let stats = simulated_stats(&mut rng);
            assert!(stats.steps < 12_000);
            assert!(stats.calories < 600);
            assert!(stats.workouts < 5);
        }
    }

    #[test]
    fn test_duplicate_friend_is_case_insensitive() {
        let friends = vec![friend("Riley", 0, 0, 0)];
        assert!(is_duplicate_friend(&friends, "riley"));
        assert!(is_duplicate_friend(&friends, "  RILEY "));
        assert!(!is_duplicate_friend(&friends, "Rylee"));
    }

    #[test]
    fn test_leaderboard_sorted_by_steps() {
        let workouts = vec![workout("2024-01-10", 30, 250), workout("2024-01-05", 30, 100)];
        let steps = vec![StepLog {
            id: Uuid::new_v4(),
            date: date("2024-01-10"),
            steps: 8_000,
        }];
        let local = local_entry(&steps, &workouts, date("2024-01-10"));
        assert_eq!((local.steps, local.calories, local.workouts), (8_000, 250, 2));

        let board = leaderboard(
            local,
            &[friend("Sam", 9_000, 100, 1), friend("Jo", 2_000, 500, 4)],
        );
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Sam", "You", "Jo"]);
    }

    #[test]
    fn test_top_performers_padded_to_five() {
        let local = LeaderboardEntry {
            name: LOCAL_DISPLAY_NAME.into(),
            steps: 0,
            calories: 900,
            workouts: 0,
            is_local_user: true,
        };
        let rows = top_performers(local, &[friend("Sam", 1, 1, 1)], RankMetric::Calories);
        assert_eq!(rows.len(), 5);
        let names: Vec<_> = rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["You", "Jordan", "Alex", "Taylor", "Sam"]);
    }

    #[test]
    fn test_top_performers_not_padded_when_full() {
        let local = local_entry(&[], &[], date("2024-01-01"));
        let friends: Vec<_> = (0..6)
            .map(|i| friend(&format!("F{}", i), i * 10, 0, 0))
            .collect();
        let rows = top_performers(local, &friends, RankMetric::Steps);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].name, "F5");
    }
}
