//! Per-date and date-range aggregates over raw logs.
//!
//! Everything here is a pure function of the log slices it is given. Range
//! membership goes through [`DateRange`] so inclusive bounds are decided in
//! exactly one place.

use crate::{FoodLog, MealType, StepLog, UserProfile, WaterLog, WorkoutLog};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::iter::Sum;

/// Fixed basal metabolic rate used for net calories
pub const BMR_CALORIES: i64 = 1500;

/// Days looked back by the weekly window (inclusive of both ends)
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// A log record that belongs to one calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for StepLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for FoodLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for WaterLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for WorkoutLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Inclusive range of calendar dates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - 7 days, today]`, crossing month and year boundaries correctly
    pub fn week_ending(today: NaiveDate) -> Self {
        Self::new(today - Duration::days(WEEK_WINDOW_DAYS), today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sum `field` over the logs dated exactly `date`; zero when none match
pub fn daily_total<R, N, F>(logs: &[R], date: NaiveDate, field: F) -> N
where
    R: Dated,
    N: Sum<N>,
    F: Fn(&R) -> N,
{
    logs.iter().filter(|l| l.date() == date).map(field).sum()
}

/// Sum `field` over the logs inside `range`
pub fn range_sum<R, N, F>(logs: &[R], range: DateRange, field: F) -> N
where
    R: Dated,
    N: Sum<N>,
    F: Fn(&R) -> N,
{
    logs.iter()
        .filter(|l| range.contains(l.date()))
        .map(field)
        .sum()
}

/// Number of logs inside `range`
pub fn range_count<R: Dated>(logs: &[R], range: DateRange) -> usize {
    logs.iter().filter(|l| range.contains(l.date())).count()
}

/// Logs of one kind dated exactly `date`, in insertion order
pub fn logs_on<R: Dated + Clone>(logs: &[R], date: NaiveDate) -> Vec<R> {
    logs.iter().filter(|l| l.date() == date).cloned().collect()
}

/// Grams of each macro
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Share of each macro in the day's grams, rounded to whole percent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    pub protein: u8,
    pub carbs: u8,
    pub fat: u8,
}

impl MacroTotals {
    pub fn total_grams(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }

    /// Percentage split; all zero when nothing was eaten
    pub fn split(&self) -> MacroSplit {
        let total = self.total_grams();
        if total <= 0.0 {
            return MacroSplit::default();
        }
        let pct = |grams: f64| (grams / total * 100.0).round() as u8;
        MacroSplit {
            protein: pct(self.protein),
            carbs: pct(self.carbs),
            fat: pct(self.fat),
        }
    }
}

pub fn macro_totals(food: &[FoodLog], date: NaiveDate) -> MacroTotals {
    food.iter()
        .filter(|l| l.date == date)
        .fold(MacroTotals::default(), |acc, l| MacroTotals {
            protein: acc.protein + l.protein,
            carbs: acc.carbs + l.carbs,
            fat: acc.fat + l.fat,
        })
}

pub fn daily_steps(steps: &[StepLog], date: NaiveDate) -> u64 {
    daily_total(steps, date, |l| u64::from(l.steps))
}

pub fn daily_water(water: &[WaterLog], date: NaiveDate) -> u32 {
    daily_total(water, date, |l| l.glasses)
}

pub fn calories_consumed(food: &[FoodLog], date: NaiveDate) -> u64 {
    daily_total(food, date, |l| u64::from(l.calories))
}

pub fn calories_burned(workouts: &[WorkoutLog], date: NaiveDate) -> u64 {
    daily_total(workouts, date, |l| u64::from(l.calories_burned))
}

/// Consumed minus burned minus the fixed BMR; negative means a deficit
pub fn net_calories(food: &[FoodLog], workouts: &[WorkoutLog], date: NaiveDate) -> i64 {
    calories_consumed(food, date) as i64 - calories_burned(workouts, date) as i64 - BMR_CALORIES
}

/// Workouts in the inclusive week window ending on `today`
pub fn weekly_workouts(workouts: &[WorkoutLog], today: NaiveDate) -> Vec<WorkoutLog> {
    let week = DateRange::week_ending(today);
    workouts
        .iter()
        .filter(|w| week.contains(w.date))
        .cloned()
        .collect()
}

pub fn steps_between(steps: &[StepLog], range: DateRange) -> u64 {
    range_sum(steps, range, |l| u64::from(l.steps))
}

pub fn workouts_between(workouts: &[WorkoutLog], range: DateRange) -> u64 {
    range_count(workouts, range) as u64
}

pub fn workout_minutes_between(workouts: &[WorkoutLog], range: DateRange) -> u64 {
    range_sum(workouts, range, |l| u64::from(l.duration))
}

pub fn calories_burned_between(workouts: &[WorkoutLog], range: DateRange) -> u64 {
    range_sum(workouts, range, |l| u64::from(l.calories_burned))
}

/// `min(round(value / goal * 100), 100)`, and 0 when the goal is 0
pub fn percent_of_goal(value: f64, goal: f64) -> u8 {
    if goal <= 0.0 || !value.is_finite() {
        return 0;
    }
    (value / goal * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Dashboard badge for the day's energy balance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieStatus {
    HighDeficit,
    Deficit,
    Maintenance,
    Surplus,
}

impl CalorieStatus {
    pub fn from_net(net: i64) -> Self {
        if net < -500 {
            CalorieStatus::HighDeficit
        } else if net < 0 {
            CalorieStatus::Deficit
        } else if net < 500 {
            CalorieStatus::Maintenance
        } else {
            CalorieStatus::Surplus
        }
    }
}

/// Food logs of one day bucketed by meal, in meal order
pub fn meals_by_type(food: &[FoodLog], date: NaiveDate) -> Vec<(MealType, Vec<FoodLog>)> {
    MealType::ALL
        .iter()
        .map(|&meal| {
            let items = food
                .iter()
                .filter(|l| l.date == date && l.meal_type == meal)
                .cloned()
                .collect::<Vec<_>>();
            (meal, items)
        })
        .filter(|(_, items)| !items.is_empty())
        .collect()
}

/// Aggregates over the trailing week window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyStats {
    pub workouts: u64,
    pub minutes: u64,
    pub calories_burned: u64,
}

pub fn weekly_stats(workouts: &[WorkoutLog], today: NaiveDate) -> WeeklyStats {
    let week = DateRange::week_ending(today);
    WeeklyStats {
        workouts: workouts_between(workouts, week),
        minutes: workout_minutes_between(workouts, week),
        calories_burned: calories_burned_between(workouts, week),
    }
}

/// Percent-of-goal figures shown on the dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub steps: u8,
    pub calories_consumed: u8,
    pub calories_burned: u8,
    pub water: u8,
}

/// Everything the dashboard shows for one date
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub steps: u64,
    pub water_glasses: u32,
    pub calories_consumed: u64,
    pub calories_burned: u64,
    pub net_calories: i64,
    pub calorie_status: CalorieStatus,
    pub macros: MacroTotals,
    pub macro_split: MacroSplit,
    pub weekly: WeeklyStats,
    pub progress: GoalProgress,
}

impl DailySummary {
    pub fn compute(
        profile: &UserProfile,
        steps: &[StepLog],
        food: &[FoodLog],
        water: &[WaterLog],
        workouts: &[WorkoutLog],
        date: NaiveDate,
    ) -> Self {
        let day_steps = daily_steps(steps, date);
        let glasses = daily_water(water, date);
        let consumed = calories_consumed(food, date);
        let burned = calories_burned(workouts, date);
        let net = net_calories(food, workouts, date);
        let macros = macro_totals(food, date);

        Self {
            date,
            steps: day_steps,
            water_glasses: glasses,
            calories_consumed: consumed,
            calories_burned: burned,
            net_calories: net,
            calorie_status: CalorieStatus::from_net(net),
            macros,
            macro_split: macros.split(),
            weekly: weekly_stats(workouts, date),
            progress: GoalProgress {
                steps: percent_of_goal(day_steps as f64, f64::from(profile.daily_step_goal)),
                calories_consumed: percent_of_goal(
                    consumed as f64,
                    f64::from(profile.daily_calorie_goal),
                ),
                calories_burned: percent_of_goal(
                    burned as f64,
                    f64::from(profile.daily_calorie_burn_goal),
                ),
                water: percent_of_goal(f64::from(glasses), f64::from(profile.daily_water_goal)),
            },
        }
    }
}
