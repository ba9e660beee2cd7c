//! Record store abstraction.
//!
//! The core never caches records between calls; every computation re-reads
//! through this trait. List kinds either append (food, workouts, custom foods,
//! challenges, friends) or upsert by date (steps, water). The profile and the
//! workout plan are zero-or-one singletons.

use crate::{
    Challenge, CustomFood, FoodLog, Friend, Result, StepLog, UserProfile, WaterLog, WorkoutLog,
    WorkoutPlan,
};
use chrono::NaiveDate;
use uuid::Uuid;

/// Typed repository over the persisted record kinds
pub trait RecordStore {
    fn profile(&self) -> Result<Option<UserProfile>>;
    fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;

    fn step_logs(&self) -> Result<Vec<StepLog>>;
    /// Overwrites `steps` in place when a log for the same date exists
    fn save_step_log(&mut self, log: StepLog) -> Result<StepLog>;

    fn food_logs(&self) -> Result<Vec<FoodLog>>;
    fn append_food_log(&mut self, log: &FoodLog) -> Result<()>;
    /// Returns `false` when no log has this id
    fn delete_food_log(&mut self, id: Uuid) -> Result<bool>;

    fn water_logs(&self) -> Result<Vec<WaterLog>>;
    /// Overwrites `glasses` in place when a log for the same date exists
    fn save_water_log(&mut self, log: WaterLog) -> Result<WaterLog>;

    fn workout_logs(&self) -> Result<Vec<WorkoutLog>>;
    fn append_workout_log(&mut self, log: &WorkoutLog) -> Result<()>;
    /// Returns `false` when no log has this id
    fn delete_workout_log(&mut self, id: Uuid) -> Result<bool>;

    fn custom_foods(&self) -> Result<Vec<CustomFood>>;
    fn append_custom_food(&mut self, food: &CustomFood) -> Result<()>;

    fn challenges(&self) -> Result<Vec<Challenge>>;
    fn append_challenge(&mut self, challenge: &Challenge) -> Result<()>;
    /// Replaces the stored challenge with the same id; `false` if absent
    fn update_challenge(&mut self, challenge: &Challenge) -> Result<bool>;

    fn friends(&self) -> Result<Vec<Friend>>;
    fn append_friend(&mut self, friend: &Friend) -> Result<()>;

    fn workout_plan(&self) -> Result<Option<WorkoutPlan>>;
    fn save_workout_plan(&mut self, plan: &WorkoutPlan) -> Result<()>;
}

/// A record kind that holds at most one entry per calendar date
pub(crate) trait DailyValue {
    fn date(&self) -> NaiveDate;
    fn overwrite_from(&mut self, other: &Self);
}

impl DailyValue for StepLog {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn overwrite_from(&mut self, other: &Self) {
        self.steps = other.steps;
    }
}

impl DailyValue for WaterLog {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn overwrite_from(&mut self, other: &Self) {
        self.glasses = other.glasses;
    }
}

/// Insert `record`, or overwrite the value of the existing record on that date
///
/// The existing record keeps its id. Returns the record as stored.
pub(crate) fn upsert_by_date<R: DailyValue + Clone>(records: &mut Vec<R>, record: R) -> R {
    match records.iter_mut().find(|r| r.date() == record.date()) {
        Some(existing) => {
            existing.overwrite_from(&record);
            existing.clone()
        }
        None => {
            records.push(record.clone());
            record
        }
    }
}

/// Remove the record matching `is_target`; `false` when nothing matched
pub(crate) fn remove_where<R>(records: &mut Vec<R>, is_target: impl Fn(&R) -> bool) -> bool {
    let before = records.len();
    records.retain(|r| !is_target(r));
    records.len() != before
}

/// Process-local store, used by tests and embedders without persistence
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    profile: Option<UserProfile>,
    steps: Vec<StepLog>,
    food: Vec<FoodLog>,
    water: Vec<WaterLog>,
    workouts: Vec<WorkoutLog>,
    custom_foods: Vec<CustomFood>,
    challenges: Vec<Challenge>,
    friends: Vec<Friend>,
    plan: Option<WorkoutPlan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn step_logs(&self) -> Result<Vec<StepLog>> {
        Ok(self.steps.clone())
    }

    fn save_step_log(&mut self, log: StepLog) -> Result<StepLog> {
        Ok(upsert_by_date(&mut self.steps, log))
    }

    fn food_logs(&self) -> Result<Vec<FoodLog>> {
        Ok(self.food.clone())
    }

    fn append_food_log(&mut self, log: &FoodLog) -> Result<()> {
        self.food.push(log.clone());
        Ok(())
    }

    fn delete_food_log(&mut self, id: Uuid) -> Result<bool> {
        Ok(remove_where(&mut self.food, |l| l.id == id))
    }

    fn water_logs(&self) -> Result<Vec<WaterLog>> {
        Ok(self.water.clone())
    }

    fn save_water_log(&mut self, log: WaterLog) -> Result<WaterLog> {
        Ok(upsert_by_date(&mut self.water, log))
    }

    fn workout_logs(&self) -> Result<Vec<WorkoutLog>> {
        Ok(self.workouts.clone())
    }

    fn append_workout_log(&mut self, log: &WorkoutLog) -> Result<()> {
        self.workouts.push(log.clone());
        Ok(())
    }

    fn delete_workout_log(&mut self, id: Uuid) -> Result<bool> {
        Ok(remove_where(&mut self.workouts, |l| l.id == id))
    }

    fn custom_foods(&self) -> Result<Vec<CustomFood>> {
        Ok(self.custom_foods.clone())
    }

    fn append_custom_food(&mut self, food: &CustomFood) -> Result<()> {
        self.custom_foods.push(food.clone());
        Ok(())
    }

    fn challenges(&self) -> Result<Vec<Challenge>> {
        Ok(self.challenges.clone())
    }

    fn append_challenge(&mut self, challenge: &Challenge) -> Result<()> {
        self.challenges.push(challenge.clone());
        Ok(())
    }

    fn update_challenge(&mut self, challenge: &Challenge) -> Result<bool> {
        match self.challenges.iter_mut().find(|c| c.id == challenge.id) {
            Some(existing) => {
                *existing = challenge.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn friends(&self) -> Result<Vec<Friend>> {
        Ok(self.friends.clone())
    }

    fn append_friend(&mut self, friend: &Friend) -> Result<()> {
        self.friends.push(friend.clone());
        Ok(())
    }

    fn workout_plan(&self) -> Result<Option<WorkoutPlan>> {
        Ok(self.plan.clone())
    }

    fn save_workout_plan(&mut self, plan: &WorkoutPlan) -> Result<()> {
        self.plan = Some(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn steps(day: &str, steps: u32) -> StepLog {
        StepLog {
            id: Uuid::new_v4(),
            date: date(day),
            steps,
        }
    }

    #[test]
    fn test_step_upsert_overwrites_same_date() {
        let mut store = MemoryStore::new();
        let first = store.save_step_log(steps("2024-01-01", 4000)).unwrap();
        let second = store.save_step_log(steps("2024-01-01", 6000)).unwrap();

        let logs = store.step_logs().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].steps, 6000);
        assert_eq!(first.id, second.id, "existing record keeps its id");
    }

    #[test]
    fn test_step_upsert_appends_new_date() {
        let mut store = MemoryStore::new();
        store.save_step_log(steps("2024-01-01", 4000)).unwrap();
        store.save_step_log(steps("2024-01-02", 5000)).unwrap();
        assert_eq!(store.step_logs().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = MemoryStore::new();
        assert!(!store.delete_food_log(Uuid::new_v4()).unwrap());
        assert!(!store.delete_workout_log(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_singletons_start_absent() {
        let store = MemoryStore::new();
        assert!(store.profile().unwrap().is_none());
        assert!(store.workout_plan().unwrap().is_none());
    }
}
