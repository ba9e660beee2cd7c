//! One-time achievements and the points they award.
//!
//! Rules are evaluated in table order against freshly computed stats. An
//! achievement id is never awarded twice, so re-running evaluation is safe.

use crate::{aggregate, streak, Achievement, StepLog, UserProfile, WaterLog, WorkoutLog};
use chrono::NaiveDate;
use serde::Serialize;

/// Inputs the rule triggers look at
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AchievementStats {
    pub today_steps: u64,
    pub total_steps: u64,
    pub total_workouts: u64,
    pub water_streak: u32,
}

impl AchievementStats {
    pub fn compute(
        steps: &[StepLog],
        workouts: &[WorkoutLog],
        water: &[WaterLog],
        water_goal: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            today_steps: aggregate::daily_steps(steps, today),
            total_steps: steps.iter().map(|l| u64::from(l.steps)).sum(),
            total_workouts: workouts.len() as u64,
            water_streak: streak::water_streak(water, water_goal, today),
        }
    }
}

/// A fixed achievement definition
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points: u32,
    pub trigger: fn(&AchievementStats) -> bool,
}

fn walked_10k_today(s: &AchievementStats) -> bool {
    s.today_steps >= 10_000
}

fn walked_100k_total(s: &AchievementStats) -> bool {
    s.total_steps >= 100_000
}

fn logged_10_workouts(s: &AchievementStats) -> bool {
    s.total_workouts >= 10
}

fn hydrated_7_days(s: &AchievementStats) -> bool {
    s.water_streak >= 7
}

pub const RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "steps-10k",
        title: "10K Steps",
        description: "Walked 10,000 steps in a single day",
        icon: "shoe-prints",
        points: 50,
        trigger: walked_10k_today,
    },
    AchievementRule {
        id: "steps-100k",
        title: "Step Master",
        description: "Reached 100,000 total steps",
        icon: "walking",
        points: 100,
        trigger: walked_100k_total,
    },
    AchievementRule {
        id: "workout-10",
        title: "Workout Warrior",
        description: "Completed 10 workouts",
        icon: "dumbbell",
        points: 75,
        trigger: logged_10_workouts,
    },
    AchievementRule {
        id: "water-streak-7",
        title: "Hydration Hero",
        description: "Met water goal for 7 days in a row",
        icon: "tint",
        points: 80,
        trigger: hydrated_7_days,
    },
];

impl AchievementRule {
    fn unlock(&self, date: NaiveDate) -> Achievement {
        Achievement {
            id: self.id.into(),
            title: self.title.into(),
            description: self.description.into(),
            date,
            icon: self.icon.into(),
            points: self.points,
        }
    }
}

/// Award every newly satisfied rule, returning what was unlocked this pass
///
/// Unlocked achievements are appended to the profile and their points added.
/// The caller is responsible for persisting the profile when the result is
/// non-empty.
pub fn evaluate(
    profile: &mut UserProfile,
    stats: &AchievementStats,
    today: NaiveDate,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    for rule in RULES {
        if profile.has_achievement(rule.id) || !(rule.trigger)(stats) {
            continue;
        }
        let achievement = rule.unlock(today);
        tracing::info!(
            "Achievement unlocked: {} (+{} points)",
            achievement.title,
            achievement.points
        );
        profile.points = profile.points.saturating_add(achievement.points);
        profile.achievements.push(achievement.clone());
        unlocked.push(achievement);
    }
    unlocked
}

/// The last four unlocked achievements, newest first
pub fn recent(profile: &UserProfile) -> Vec<Achievement> {
    profile.achievements.iter().rev().take(4).cloned().collect()
}

/// Point thresholds the progress bar steps through
pub const POINT_MILESTONES: [u32; 7] = [100, 250, 500, 1000, 2000, 5000, 10_000];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PointsProgress {
    pub points: u32,
    pub next_milestone: u32,
    pub points_to_next: u32,
    pub percent: u8,
}

/// Progress toward the first milestone strictly above `points`
///
/// Past the last milestone the target becomes `points + 1000`.
pub fn points_progress(points: u32) -> PointsProgress {
    let next_milestone = POINT_MILESTONES
        .iter()
        .copied()
        .find(|&m| m > points)
        .unwrap_or_else(|| points.saturating_add(1000));
    PointsProgress {
        points,
        next_milestone,
        points_to_next: next_milestone - points,
        percent: aggregate::percent_of_goal(f64::from(points), f64::from(next_milestone)),
    }
}
