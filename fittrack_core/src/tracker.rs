//! The tracker service: validated mutations and store-backed queries.
//!
//! `FitnessTracker` owns a [`RecordStore`] and re-reads it on every call, so
//! queries always reflect the latest writes. Every log save re-evaluates the
//! achievement rules and reports what was unlocked.

use crate::achievements::{self, AchievementStats, PointsProgress};
use crate::aggregate::{
    self, CalorieStatus, DailySummary, DateRange, MacroSplit, MacroTotals, WeeklyStats,
};
use crate::catalog::get_default_catalog;
use crate::config::{Config, ProfileDefaults};
use crate::plan;
use crate::social::{self, ChallengeProgress, LeaderboardEntry, RankMetric};
use crate::store::RecordStore;
use crate::suggest::{self, FoodSuggestions, SuggestionGroup};
use crate::{
    estimate, streak, Achievement, Catalog, Challenge, ChallengeType, CustomFood, DayPlan, Error,
    FoodItem, FoodLog, Friend, GoalsUpdate, MealType, NewChallenge, NewCustomFood, NewFood,
    NewWorkout, PlanRequest, PlannedWorkout, Result, StepLog, UserProfile, WaterLog, WorkoutLog,
    WorkoutPlan, LOCAL_USER,
};
use chrono::{Local, NaiveDate, Weekday};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

/// A saved log record plus any achievements the save unlocked
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Logged<T> {
    pub record: T,
    pub unlocked: Vec<Achievement>,
}

/// Service facade over a record store
pub struct FitnessTracker<S: RecordStore> {
    store: S,
    catalog: &'static Catalog,
    defaults: ProfileDefaults,
    today: Option<NaiveDate>,
}

impl<S: RecordStore> FitnessTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: get_default_catalog(),
            defaults: ProfileDefaults::default(),
            today: None,
        }
    }

    /// Use the profile defaults from `config` for first-time profile creation
    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            defaults: config.profile.clone(),
            ..Self::new(store)
        }
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_catalog(mut self, catalog: &'static Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// The stored profile, or a fresh one built from the configured defaults
    pub fn profile(&self) -> Result<UserProfile> {
        Ok(self
            .store
            .profile()?
            .unwrap_or_else(|| UserProfile::from(&self.defaults)))
    }

    /// Edit goals and body metrics; points and achievements are untouched
    pub fn update_goals(&mut self, update: GoalsUpdate) -> Result<UserProfile> {
        let mut profile = self.profile()?;

        if let Some(name) = update.name {
            profile.name = require_text(&name, "name")?;
        }
        if let Some(goal) = update.daily_water_goal {
            if goal == 0 {
                return Err(Error::validation("daily water goal must be at least 1"));
            }
            profile.daily_water_goal = goal;
        }
        if let Some(height) = update.height_cm {
            profile.height_cm = Some(positive(height, "height")?);
        }
        if let Some(weight) = update.weight_kg {
            profile.weight_kg = Some(positive(weight, "weight")?);
        }
        let goals = [
            (update.daily_calorie_goal, &mut profile.daily_calorie_goal, "daily calorie goal"),
            (update.daily_step_goal, &mut profile.daily_step_goal, "daily step goal"),
            (update.weekly_workout_goal, &mut profile.weekly_workout_goal, "weekly workout goal"),
            (update.weekly_minutes_goal, &mut profile.weekly_minutes_goal, "weekly minutes goal"),
            (
                update.daily_calorie_burn_goal,
                &mut profile.daily_calorie_burn_goal,
                "daily calorie burn goal",
            ),
        ];
        for (value, field, label) in goals {
            if let Some(value) = value {
                if value == 0 {
                    return Err(Error::validation(format!("{} must be positive", label)));
                }
                *field = value;
            }
        }

        self.store.save_profile(&profile)?;
        tracing::info!("Updated goals for {}", profile.name);
        Ok(profile)
    }

    // ========================================================================
    // Logging
    // ========================================================================

    /// Record the steps for `date`, replacing any earlier value for that date
    pub fn log_steps(&mut self, steps: i64, date: NaiveDate) -> Result<Logged<StepLog>> {
        let steps = count(steps, "steps")?;
        let record = self.store.save_step_log(StepLog {
            id: Uuid::new_v4(),
            date,
            steps,
        })?;
        tracing::info!("Logged {} steps for {}", record.steps, date);
        self.logged(record)
    }

    /// Record the glasses of water for `date`, replacing any earlier value
    pub fn log_water(&mut self, glasses: i64, date: NaiveDate) -> Result<Logged<WaterLog>> {
        let glasses = count(glasses, "glasses")?;
        let record = self.store.save_water_log(WaterLog {
            id: Uuid::new_v4(),
            date,
            glasses,
        })?;
        tracing::info!("Logged {} glasses of water for {}", record.glasses, date);
        self.logged(record)
    }

    pub fn log_food(&mut self, food: NewFood, date: NaiveDate) -> Result<Logged<FoodLog>> {
        let record = FoodLog {
            id: Uuid::new_v4(),
            date,
            name: require_text(&food.name, "food name")?,
            calories: count(food.calories, "calories")?,
            protein: grams(food.protein, "protein")?,
            carbs: grams(food.carbs, "carbs")?,
            fat: grams(food.fat, "fat")?,
            meal_type: food.meal_type.unwrap_or(MealType::Snack),
            serving_size: serving(food.serving_size)?,
        };
        self.store.append_food_log(&record)?;
        tracing::info!(
            "Logged {} ({} cal) as {} on {}",
            record.name,
            record.calories,
            record.meal_type.as_str(),
            date
        );
        self.logged(record)
    }

    pub fn log_workout(&mut self, workout: NewWorkout, date: NaiveDate) -> Result<Logged<WorkoutLog>> {
        let duration = count(workout.duration, "duration")?;
        if duration == 0 {
            return Err(Error::validation("duration must be positive"));
        }
        let record = WorkoutLog {
            id: Uuid::new_v4(),
            date,
            workout_type: require_text(&workout.workout_type, "workout type")?,
            duration,
            calories_burned: count(workout.calories_burned, "calories burned")?,
            intensity: workout.intensity.unwrap_or_default(),
            notes: workout.notes.unwrap_or_default(),
        };
        self.store.append_workout_log(&record)?;
        tracing::info!(
            "Logged {} for {} min on {}",
            record.workout_type,
            record.duration,
            date
        );
        self.logged(record)
    }

    /// `false` when no food log has this id
    pub fn delete_food(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.store.delete_food_log(id)?;
        if removed {
            tracing::info!("Deleted food log {}", id);
        }
        Ok(removed)
    }

    /// `false` when no workout log has this id
    pub fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.store.delete_workout_log(id)?;
        if removed {
            tracing::info!("Deleted workout log {}", id);
        }
        Ok(removed)
    }

    pub fn save_custom_food(&mut self, food: NewCustomFood) -> Result<CustomFood> {
        let serving_unit = match food.serving_unit {
            Some(unit) if !unit.trim().is_empty() => unit.trim().to_string(),
            _ => "serving".to_string(),
        };
        let record = CustomFood {
            id: Uuid::new_v4(),
            name: require_text(&food.name, "food name")?,
            calories: count(food.calories, "calories")?,
            protein: grams(food.protein, "protein")?,
            carbs: grams(food.carbs, "carbs")?,
            fat: grams(food.fat, "fat")?,
            serving_size: serving(food.serving_size)?,
            serving_unit,
        };
        self.store.append_custom_food(&record)?;
        tracing::info!("Saved custom food {}", record.name);
        Ok(record)
    }

    fn logged<T>(&mut self, record: T) -> Result<Logged<T>> {
        let unlocked = self.check_achievements()?;
        Ok(Logged { record, unlocked })
    }

    /// Evaluate the achievement rules against current logs
    ///
    /// The profile is only written when something new was unlocked.
    pub fn check_achievements(&mut self) -> Result<Vec<Achievement>> {
        let mut profile = self.profile()?;
        let today = self.today();
        let stats = AchievementStats::compute(
            &self.store.step_logs()?,
            &self.store.workout_logs()?,
            &self.store.water_logs()?,
            profile.daily_water_goal,
            today,
        );
        tracing::debug!("Evaluating achievements with {:?}", stats);

        let unlocked = achievements::evaluate(&mut profile, &stats, today);
        if !unlocked.is_empty() {
            self.store.save_profile(&profile)?;
        }
        Ok(unlocked)
    }

    // ========================================================================
    // Daily and Range Aggregates
    // ========================================================================

    pub fn daily_steps(&self, date: NaiveDate) -> Result<u64> {
        Ok(aggregate::daily_steps(&self.store.step_logs()?, date))
    }

    pub fn daily_water(&self, date: NaiveDate) -> Result<u32> {
        Ok(aggregate::daily_water(&self.store.water_logs()?, date))
    }

    pub fn calories_consumed(&self, date: NaiveDate) -> Result<u64> {
        Ok(aggregate::calories_consumed(&self.store.food_logs()?, date))
    }

    pub fn calories_burned(&self, date: NaiveDate) -> Result<u64> {
        Ok(aggregate::calories_burned(&self.store.workout_logs()?, date))
    }

    pub fn macro_totals(&self, date: NaiveDate) -> Result<MacroTotals> {
        Ok(aggregate::macro_totals(&self.store.food_logs()?, date))
    }

    pub fn macro_split(&self, date: NaiveDate) -> Result<MacroSplit> {
        Ok(self.macro_totals(date)?.split())
    }

    pub fn net_calories(&self, date: NaiveDate) -> Result<i64> {
        Ok(aggregate::net_calories(
            &self.store.food_logs()?,
            &self.store.workout_logs()?,
            date,
        ))
    }

    pub fn calorie_status(&self, date: NaiveDate) -> Result<CalorieStatus> {
        Ok(CalorieStatus::from_net(self.net_calories(date)?))
    }

    pub fn food_logs_on(&self, date: NaiveDate) -> Result<Vec<FoodLog>> {
        Ok(aggregate::logs_on(&self.store.food_logs()?, date))
    }

    pub fn meals(&self, date: NaiveDate) -> Result<Vec<(MealType, Vec<FoodLog>)>> {
        Ok(aggregate::meals_by_type(&self.store.food_logs()?, date))
    }

    pub fn workouts_on(&self, date: NaiveDate) -> Result<Vec<WorkoutLog>> {
        Ok(aggregate::logs_on(&self.store.workout_logs()?, date))
    }

    /// Workouts in `[today - 7 days, today]`
    pub fn weekly_workouts(&self) -> Result<Vec<WorkoutLog>> {
        Ok(aggregate::weekly_workouts(&self.store.workout_logs()?, self.today()))
    }

    pub fn weekly_stats(&self) -> Result<WeeklyStats> {
        Ok(aggregate::weekly_stats(&self.store.workout_logs()?, self.today()))
    }

    pub fn steps_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64> {
        Ok(aggregate::steps_between(
            &self.store.step_logs()?,
            DateRange::new(start, end),
        ))
    }

    pub fn workouts_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64> {
        Ok(aggregate::workouts_between(
            &self.store.workout_logs()?,
            DateRange::new(start, end),
        ))
    }

    pub fn workout_minutes_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64> {
        Ok(aggregate::workout_minutes_between(
            &self.store.workout_logs()?,
            DateRange::new(start, end),
        ))
    }

    pub fn calories_burned_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64> {
        Ok(aggregate::calories_burned_between(
            &self.store.workout_logs()?,
            DateRange::new(start, end),
        ))
    }

    pub fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        Ok(DailySummary::compute(
            &self.profile()?,
            &self.store.step_logs()?,
            &self.store.food_logs()?,
            &self.store.water_logs()?,
            &self.store.workout_logs()?,
            date,
        ))
    }

    // ========================================================================
    // Streaks
    // ========================================================================

    /// Water-goal streak as of today
    pub fn water_streak(&self) -> Result<u32> {
        self.water_streak_as_of(self.today())
    }

    pub fn water_streak_as_of(&self, date: NaiveDate) -> Result<u32> {
        let goal = self.profile()?.daily_water_goal;
        Ok(streak::water_streak(&self.store.water_logs()?, goal, date))
    }

    pub fn workout_streak(&self) -> Result<u32> {
        Ok(streak::workout_streak(&self.store.workout_logs()?, self.today()))
    }

    // ========================================================================
    // Suggestions and Estimates
    // ========================================================================

    /// Foods for the calories still left today
    pub fn suggest_foods(&self) -> Result<FoodSuggestions> {
        let today = self.today();
        let remaining =
            i64::from(self.profile()?.daily_calorie_goal) - self.calories_consumed(today)? as i64;
        Ok(suggest::suggest_foods(
            self.catalog,
            remaining,
            &self.macro_totals(today)?,
        ))
    }

    pub fn suggest_workouts(&self, body_part: &str) -> Vec<SuggestionGroup> {
        suggest::suggest_workouts(self.catalog, body_part)
    }

    /// Calories for a catalog exercise at the profile's weight
    ///
    /// Exercises missing from the catalog use the fallback METs.
    pub fn estimate_calories(
        &self,
        exercise: &str,
        duration_minutes: u32,
        intensity: crate::Intensity,
    ) -> Result<u32> {
        let found = self.catalog.find_exercise(exercise).map(|(_, e)| e);
        if found.is_none() {
            tracing::debug!("No MET data for {:?}, using fallback", exercise);
        }
        Ok(estimate::estimate_calories(
            found,
            duration_minutes,
            intensity,
            self.profile()?.weight_kg,
        ))
    }

    /// Custom foods first, then catalog foods
    pub fn search_foods(&self, query: &str) -> Result<Vec<FoodItem>> {
        Ok(self
            .catalog
            .search_foods(query, &self.store.custom_foods()?))
    }

    pub fn custom_foods(&self) -> Result<Vec<CustomFood>> {
        self.store.custom_foods()
    }

    // ========================================================================
    // Workout Plan
    // ========================================================================

    pub fn generate_plan(&mut self, request: PlanRequest) -> Result<WorkoutPlan> {
        self.generate_plan_with_rng(request, &mut rand::thread_rng())
    }

    /// Generate and store a plan, replacing any previous one
    pub fn generate_plan_with_rng<R: Rng + ?Sized>(
        &mut self,
        request: PlanRequest,
        rng: &mut R,
    ) -> Result<WorkoutPlan> {
        let plan = plan::generate_plan(self.catalog, &request, self.today(), rng)?;
        self.store.save_workout_plan(&plan)?;
        tracing::info!(
            "Saved {:?} plan: {} days/week, {} min sessions",
            plan.goal,
            plan.days,
            plan.duration
        );
        Ok(plan)
    }

    pub fn workout_plan(&self) -> Result<Option<WorkoutPlan>> {
        self.store.workout_plan()
    }

    /// Estimated burn of one planned session at the profile's weight
    pub fn planned_calories(&self, workout: &PlannedWorkout) -> Result<u32> {
        Ok(plan::estimate_plan_calories(
            workout,
            self.profile()?.weight_kg,
        ))
    }

    /// Log the stored plan's session for `weekday` as a workout on `date`
    ///
    /// Returns `None` when no plan is stored or the day is a rest day.
    pub fn log_planned_workout(
        &mut self,
        weekday: Weekday,
        date: NaiveDate,
    ) -> Result<Option<Logged<WorkoutLog>>> {
        let Some(plan) = self.store.workout_plan()? else {
            return Ok(None);
        };
        let Some(workout) = plan.day(weekday).and_then(DayPlan::as_workout) else {
            return Ok(None);
        };

        let names: Vec<&str> = workout.exercises.iter().map(|e| e.name.as_str()).collect();
        let new = NewWorkout {
            workout_type: workout.focus.workout_type().to_string(),
            duration: i64::from(workout.duration),
            calories_burned: i64::from(self.planned_calories(workout)?),
            intensity: Some(workout.intensity),
            notes: Some(format!("Planned workout ({})", names.join(", "))),
        };
        self.log_workout(new, date).map(Some)
    }

    // ========================================================================
    // Gamification
    // ========================================================================

    pub fn points_progress(&self) -> Result<PointsProgress> {
        Ok(achievements::points_progress(self.profile()?.points))
    }

    pub fn recent_achievements(&self) -> Result<Vec<Achievement>> {
        Ok(achievements::recent(&self.profile()?))
    }

    // ========================================================================
    // Challenges
    // ========================================================================

    pub fn create_challenge(&mut self, new: NewChallenge) -> Result<Challenge> {
        let name = require_text(&new.name, "challenge name")?;
        let goal = count(new.goal, "goal")?;
        if goal == 0 {
            return Err(Error::validation("goal must be positive"));
        }
        if new.end_date <= new.start_date {
            return Err(Error::validation("end date must be after start date"));
        }

        let challenge = Challenge {
            id: Uuid::new_v4(),
            name,
            description: new.description.trim().to_string(),
            challenge_type: new.challenge_type,
            goal,
            start_date: new.start_date,
            end_date: new.end_date,
            visibility: new.visibility,
            participants: vec![LOCAL_USER.to_string()],
            created_at: self.today(),
        };
        self.store.append_challenge(&challenge)?;
        tracing::info!("Created challenge {}", challenge.name);
        Ok(challenge)
    }

    /// `false` when the id is unknown or the local user already joined
    pub fn join_challenge(&mut self, id: Uuid) -> Result<bool> {
        let Some(mut challenge) = self.store.challenges()?.into_iter().find(|c| c.id == id) else {
            return Ok(false);
        };
        if challenge.has_local_user() {
            return Ok(false);
        }
        challenge.participants.push(LOCAL_USER.to_string());
        let updated = self.store.update_challenge(&challenge)?;
        if updated {
            tracing::info!("Joined challenge {}", challenge.name);
        }
        Ok(updated)
    }

    pub fn challenges(&self) -> Result<Vec<Challenge>> {
        self.store.challenges()
    }

    pub fn active_challenges(&self) -> Result<Vec<Challenge>> {
        Ok(social::active_challenges(&self.store.challenges()?, self.today()))
    }

    pub fn challenge_progress(&self, challenge: &Challenge) -> Result<ChallengeProgress> {
        Ok(social::challenge_progress(
            challenge,
            &self.store.step_logs()?,
            &self.store.workout_logs()?,
        ))
    }

    /// Community challenges the local user can still join
    pub fn open_challenges(&self, kind: Option<ChallengeType>) -> Result<Vec<Challenge>> {
        Ok(social::open_challenges(
            &self.store.challenges()?,
            self.today(),
            kind,
        ))
    }

    /// Open challenges, seeding the example set first when there are none
    pub fn open_or_example_challenges(&mut self, kind: Option<ChallengeType>) -> Result<Vec<Challenge>> {
        let open = self.open_challenges(kind)?;
        if !open.is_empty() {
            return Ok(open);
        }
        self.seed_example_challenges()
    }

    /// Store the three example community challenges and return them
    pub fn seed_example_challenges(&mut self) -> Result<Vec<Challenge>> {
        let examples = social::example_challenges(self.today());
        for challenge in &examples {
            self.store.append_challenge(challenge)?;
        }
        tracing::info!("Seeded {} example challenges", examples.len());
        Ok(examples)
    }

    // ========================================================================
    // Friends
    // ========================================================================

    pub fn add_friend(&mut self, name: &str) -> Result<Option<Friend>> {
        self.add_friend_with_rng(name, &mut rand::thread_rng())
    }

    /// Add a friend with simulated stats; `None` for a duplicate name
    pub fn add_friend_with_rng<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        rng: &mut R,
    ) -> Result<Option<Friend>> {
        let name = require_text(name, "friend name")?;
        if social::is_duplicate_friend(&self.store.friends()?, &name) {
            tracing::debug!("Friend {} already exists", name);
            return Ok(None);
        }
        let friend = Friend {
            id: Uuid::new_v4(),
            name,
            stats: social::simulated_stats(rng),
        };
        self.store.append_friend(&friend)?;
        tracing::info!("Added friend {}", friend.name);
        Ok(Some(friend))
    }

    pub fn friends(&self) -> Result<Vec<Friend>> {
        self.store.friends()
    }

    fn local_entry(&self) -> Result<LeaderboardEntry> {
        Ok(social::local_entry(
            &self.store.step_logs()?,
            &self.store.workout_logs()?,
            self.today(),
        ))
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(social::leaderboard(self.local_entry()?, &self.store.friends()?))
    }

    pub fn top_performers(&self, metric: RankMetric) -> Result<Vec<LeaderboardEntry>> {
        Ok(social::top_performers(
            self.local_entry()?,
            &self.store.friends()?,
            metric,
        ))
    }
}

// ============================================================================
// Input Validation
// ============================================================================

fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// A non-negative whole number that fits the record field
fn count(value: i64, field: &str) -> Result<u32> {
    if value < 0 {
        return Err(Error::validation(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    u32::try_from(value).map_err(|_| Error::validation(format!("{} is too large: {}", field, value)))
}

/// Macro grams default to zero and must be finite and non-negative
fn grams(value: Option<f64>, field: &str) -> Result<f64> {
    let grams = value.unwrap_or(0.0);
    if !grams.is_finite() || grams < 0.0 {
        return Err(Error::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(grams)
}

fn serving(value: Option<f64>) -> Result<f64> {
    match value {
        None => Ok(1.0),
        Some(size) => positive(size, "serving size"),
    }
}

fn positive(value: f64, field: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::validation(format!("{} must be positive", field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{Intensity, Visibility};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracker() -> FitnessTracker<MemoryStore> {
        crate::logging::init_test();
        FitnessTracker::new(MemoryStore::new()).with_today(date("2024-01-10"))
    }

    fn food(name: &str, calories: i64) -> NewFood {
        NewFood {
            name: name.into(),
            calories,
            ..Default::default()
        }
    }

    #[test]
    fn test_food_defaults_are_filled() {
        let mut t = tracker();
        let logged = t.log_food(food("Banana", 105), date("2024-01-10")).unwrap();
        assert_eq!(logged.record.meal_type, MealType::Snack);
        assert_eq!(logged.record.serving_size, 1.0);
        assert_eq!(logged.record.protein, 0.0);
    }

    #[test]
    fn test_validation_happens_before_write() {
        let mut t = tracker();
        assert!(matches!(
            t.log_food(food("Cake", -5), date("2024-01-10")),
            Err(Error::Validation(_))
        ));
        assert!(t.log_food(food("   ", 100), date("2024-01-10")).is_err());
        assert!(t
            .log_food(
                NewFood {
                    protein: Some(-1.0),
                    ..food("Shake", 200)
                },
                date("2024-01-10")
            )
            .is_err());
        assert!(t.log_steps(-1, date("2024-01-10")).is_err());
        assert!(t
            .log_workout(
                NewWorkout {
                    workout_type: "Run".into(),
                    duration: 0,
                    ..Default::default()
                },
                date("2024-01-10")
            )
            .is_err());

        assert!(t.store().food_logs().unwrap().is_empty());
        assert!(t.store().step_logs().unwrap().is_empty());
        assert!(t.store().workout_logs().unwrap().is_empty());
    }

    #[test]
    fn test_log_save_unlocks_achievement_once() {
        let mut t = tracker();
        let first = t.log_steps(10_500, date("2024-01-10")).unwrap();
        assert_eq!(first.unlocked.len(), 1);
        assert_eq!(first.unlocked[0].id, "steps-10k");

        let again = t.log_steps(11_000, date("2024-01-10")).unwrap();
        assert!(again.unlocked.is_empty());
        assert_eq!(t.profile().unwrap().points, 50);
    }

    #[test]
    fn test_update_goals() {
        let mut t = tracker();
        let profile = t
            .update_goals(GoalsUpdate {
                daily_step_goal: Some(12_000),
                weight_kg: Some(82.5),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(profile.daily_step_goal, 12_000);
        assert_eq!(profile.daily_water_goal, 8);
        assert_eq!(t.profile().unwrap().weight_kg, Some(82.5));

        assert!(t
            .update_goals(GoalsUpdate {
                daily_water_goal: Some(0),
                ..Default::default()
            })
            .is_err());

        let zero_goals: [fn(&mut GoalsUpdate); 5] = [
            |u| u.daily_calorie_goal = Some(0),
            |u| u.daily_step_goal = Some(0),
            |u| u.weekly_workout_goal = Some(0),
            |u| u.weekly_minutes_goal = Some(0),
            |u| u.daily_calorie_burn_goal = Some(0),
        ];
        for set_zero in zero_goals {
            let mut update = GoalsUpdate::default();
            set_zero(&mut update);
            let err = t.update_goals(update).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }

        // A rejected edit leaves every field of the stored profile alone
        let err = t
            .update_goals(GoalsUpdate {
                daily_step_goal: Some(9_000),
                daily_calorie_goal: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let stored = t.profile().unwrap();
        assert_eq!(stored.daily_step_goal, 12_000);
        assert_eq!(stored.daily_calorie_goal, profile.daily_calorie_goal);
        assert!(matches!(t.suggest_foods().unwrap(), FoodSuggestions::Foods { .. }));
    }

    #[test]
    fn test_challenge_lifecycle() {
        let mut t = tracker();
        let bad = NewChallenge {
            name: "Run".into(),
            description: String::new(),
            challenge_type: ChallengeType::Minutes,
            goal: 300,
            start_date: date("2024-01-10"),
            end_date: date("2024-01-10"),
            visibility: Visibility::Friends,
        };
        assert!(t.create_challenge(bad.clone()).is_err());

        let created = t
            .create_challenge(NewChallenge {
                end_date: date("2024-01-20"),
                ..bad
            })
            .unwrap();
        assert_eq!(created.participants, vec![LOCAL_USER.to_string()]);
        assert_eq!(t.active_challenges().unwrap().len(), 1);
        assert!(!t.join_challenge(created.id).unwrap());
        assert!(!t.join_challenge(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_seeding_and_joining_examples() {
        let mut t = tracker();
        let seeded = t.open_or_example_challenges(None).unwrap();
        assert_eq!(seeded.len(), 3);

        // A second call finds the stored examples instead of seeding again.
        assert_eq!(t.open_or_example_challenges(None).unwrap().len(), 3);
        assert_eq!(t.challenges().unwrap().len(), 3);

        assert!(t.join_challenge(seeded[0].id).unwrap());
        assert_eq!(t.open_challenges(None).unwrap().len(), 2);
        assert_eq!(t.active_challenges().unwrap().len(), 1);
    }

    #[test]
    fn test_friends_reject_duplicates() {
        let mut t = tracker();
        assert!(t.add_friend("Riley").unwrap().is_some());
        assert!(t.add_friend("riley").unwrap().is_none());
        assert!(matches!(t.add_friend(" "), Err(Error::Validation(_))));
        assert_eq!(t.friends().unwrap().len(), 1);
        assert_eq!(t.leaderboard().unwrap().len(), 2);
    }

    #[test]
    fn test_estimate_uses_profile_weight() {
        let mut t = tracker();
        let at_70 = t.estimate_calories("Unknown Sport", 60, Intensity::Medium).unwrap();
        assert_eq!(at_70, 350);

        t.update_goals(GoalsUpdate {
            weight_kg: Some(100.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            t.estimate_calories("Unknown Sport", 60, Intensity::Medium).unwrap(),
            500
        );
    }

    #[test]
    fn test_food_suggestions_after_goal_reached() {
        let mut t = tracker();
        t.log_food(food("Feast", 2_500), date("2024-01-10")).unwrap();
        assert_eq!(t.suggest_foods().unwrap(), FoodSuggestions::GoalReached);
    }
}
