//! Core domain types for the fitness tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Daily logs (steps, food, water, workouts)
//! - The singleton user profile and its achievements
//! - Social records (challenges, friends)
//! - Weekly workout plans
//! - Static catalog entries (foods, exercises)
//! - Validated input shapes for mutation entry points

use crate::config::ProfileDefaults;
use crate::{Error, Result};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Participant id that denotes the local user in challenge rosters
pub const LOCAL_USER: &str = "user";

// ============================================================================
// Enumerations
// ============================================================================

/// Meal a food entry belongs to
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(Error::validation(format!("Unknown meal type: {}", other))),
        }
    }
}

/// Effort level of a workout
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Intensity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            other => Err(Error::validation(format!("Unknown intensity: {}", other))),
        }
    }
}

/// Quantity a challenge measures
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    Steps,
    Calories,
    Workouts,
    Minutes,
}

impl ChallengeType {
    /// Unit shown next to challenge progress
    pub fn unit_label(&self) -> &'static str {
        match self {
            ChallengeType::Steps => "steps",
            ChallengeType::Calories => "cal burned",
            ChallengeType::Workouts => "workouts",
            ChallengeType::Minutes => "minutes",
        }
    }
}

impl FromStr for ChallengeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "steps" => Ok(ChallengeType::Steps),
            "calories" => Ok(ChallengeType::Calories),
            "workouts" => Ok(ChallengeType::Workouts),
            "minutes" => Ok(ChallengeType::Minutes),
            other => Err(Error::validation(format!("Unknown challenge type: {}", other))),
        }
    }
}

/// Who can see and join a challenge
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Friends,
    Community,
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "friends" => Ok(Visibility::Friends),
            "community" => Ok(Visibility::Community),
            other => Err(Error::validation(format!("Unknown visibility: {}", other))),
        }
    }
}

/// Goal a workout plan is generated for
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    LoseWeight,
    BuildMuscle,
    ImproveEndurance,
    #[default]
    General,
}

impl FromStr for FitnessGoal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" => Ok(FitnessGoal::LoseWeight),
            "build_muscle" => Ok(FitnessGoal::BuildMuscle),
            "improve_endurance" => Ok(FitnessGoal::ImproveEndurance),
            // Anything unrecognised gets the balanced plan.
            _ => Ok(FitnessGoal::General),
        }
    }
}

/// Dominant exercise category of a planned workout day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Cardio,
    Strength,
    Mixed,
}

impl Focus {
    /// Workout type recorded when a planned day is logged
    pub fn workout_type(&self) -> &'static str {
        match self {
            Focus::Cardio => "Cardio Workout",
            Focus::Strength => "Strength Training",
            Focus::Mixed => "Mixed Workout",
        }
    }
}

/// Exercise catalog grouping
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExerciseCategory {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    Other,
}

impl ExerciseCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseCategory::Cardio => "Cardio",
            ExerciseCategory::Strength => "Strength",
            ExerciseCategory::Flexibility => "Flexibility",
            ExerciseCategory::Sports => "Sports",
            ExerciseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Profile and Achievements
// ============================================================================

/// A one-time reward; `id` is the de-duplication key
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub icon: String,
    pub points: u32,
}

/// The singleton user profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub daily_calorie_goal: u32,
    pub daily_step_goal: u32,
    pub daily_water_goal: u32,
    pub weekly_workout_goal: u32,
    pub weekly_minutes_goal: u32,
    pub daily_calorie_burn_goal: u32,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl UserProfile {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

impl From<&ProfileDefaults> for UserProfile {
    fn from(defaults: &ProfileDefaults) -> Self {
        Self {
            name: defaults.name.clone(),
            daily_calorie_goal: defaults.daily_calorie_goal,
            daily_step_goal: defaults.daily_step_goal,
            daily_water_goal: defaults.daily_water_goal,
            weekly_workout_goal: defaults.weekly_workout_goal,
            weekly_minutes_goal: defaults.weekly_minutes_goal,
            daily_calorie_burn_goal: defaults.daily_calorie_burn_goal,
            height_cm: defaults.height_cm,
            weight_kg: defaults.weight_kg,
            points: 0,
            achievements: Vec::new(),
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::from(&ProfileDefaults::default())
    }
}

// ============================================================================
// Daily Logs
// ============================================================================

/// Steps walked on one date; at most one per date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StepLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub steps: u32,
}

/// One food entry; many per date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default = "default_serving_size")]
    pub serving_size: f64,
}

/// Glasses of water drunk on one date; at most one per date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WaterLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub glasses: u32,
}

/// One completed workout; many per date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub workout_type: String,
    pub duration: u32,
    pub calories_burned: u32,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default)]
    pub notes: String,
}

/// A user-defined food template, independent of any date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomFood {
    pub id: Uuid,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default = "default_serving_size")]
    pub serving_size: f64,
    #[serde(default = "default_serving_unit")]
    pub serving_unit: String,
}

fn default_serving_size() -> f64 {
    1.0
}

fn default_serving_unit() -> String {
    "serving".into()
}

// ============================================================================
// Social Types
// ============================================================================

/// A time-boxed goal shared between participants
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Challenge {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub challenge_type: ChallengeType,
    pub goal: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: NaiveDate,
}

impl Challenge {
    pub fn has_local_user(&self) -> bool {
        self.participants.iter().any(|p| p == LOCAL_USER)
    }

    /// Joined by the local user and running on `today`
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.has_local_user() && self.start_date <= today && today <= self.end_date
    }

    /// A community challenge the local user could still join
    pub fn is_open_to_join(&self, today: NaiveDate) -> bool {
        self.visibility == Visibility::Community && self.end_date >= today && !self.has_local_user()
    }
}

/// Simulated activity numbers shown for a friend
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendStats {
    pub steps: u32,
    pub calories: u32,
    pub workouts: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Friend {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub stats: FriendStats,
}

// ============================================================================
// Workout Plan Types
// ============================================================================

/// One exercise slot inside a planned workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedExercise {
    pub name: String,
    pub duration: u32,
    pub category: ExerciseCategory,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedWorkout {
    pub focus: Focus,
    pub duration: u32,
    pub intensity: Intensity,
    pub exercises: Vec<PlannedExercise>,
}

/// What a single weekday holds in a plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayPlan {
    Rest,
    Workout(PlannedWorkout),
}

impl DayPlan {
    pub fn is_rest(&self) -> bool {
        matches!(self, DayPlan::Rest)
    }

    pub fn as_workout(&self) -> Option<&PlannedWorkout> {
        match self {
            DayPlan::Rest => None,
            DayPlan::Workout(workout) => Some(workout),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduledDay {
    pub weekday: Weekday,
    pub plan: DayPlan,
}

/// The singleton weekly plan; replaced wholesale on regeneration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub goal: FitnessGoal,
    pub days: u8,
    pub duration: u32,
    pub created_at: NaiveDate,
    /// Equipment flags are recorded but do not influence exercise choice.
    #[serde(default)]
    pub has_gym: bool,
    #[serde(default)]
    pub has_home: bool,
    /// Monday through Sunday, always seven entries
    pub schedule: Vec<ScheduledDay>,
}

impl WorkoutPlan {
    pub fn day(&self, weekday: Weekday) -> Option<&DayPlan> {
        self.schedule
            .iter()
            .find(|d| d.weekday == weekday)
            .map(|d| &d.plan)
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A named serving from the food catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<&CustomFood> for FoodItem {
    fn from(food: &CustomFood) -> Self {
        Self {
            name: food.name.clone(),
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub body_parts: Vec<String>,
    pub mets_low: f64,
    pub mets_high: f64,
}

impl Exercise {
    pub fn average_met(&self) -> f64 {
        (self.mets_low + self.mets_high) / 2.0
    }

    pub fn targets(&self, body_part: &str) -> bool {
        self.body_parts.iter().any(|b| b.eq_ignore_ascii_case(body_part))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseGroup {
    pub category: ExerciseCategory,
    pub exercises: Vec<Exercise>,
}

/// Read-only reference data: foods and grouped exercises
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub foods: Vec<FoodItem>,
    pub exercises: Vec<ExerciseGroup>,
}

// ============================================================================
// Input Types
// ============================================================================

/// Caller-supplied food entry, normalised by the tracker before saving
#[derive(Clone, Debug, Default)]
pub struct NewFood {
    pub name: String,
    pub calories: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub meal_type: Option<MealType>,
    pub serving_size: Option<f64>,
}

/// Caller-supplied custom food template
#[derive(Clone, Debug, Default)]
pub struct NewCustomFood {
    pub name: String,
    pub calories: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
}

/// Caller-supplied workout entry
#[derive(Clone, Debug, Default)]
pub struct NewWorkout {
    pub workout_type: String,
    pub duration: i64,
    pub calories_burned: i64,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
}

/// Caller-supplied challenge definition
#[derive(Clone, Debug)]
pub struct NewChallenge {
    pub name: String,
    pub description: String,
    pub challenge_type: ChallengeType,
    pub goal: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub visibility: Visibility,
}

/// Parameters for weekly plan generation
#[derive(Clone, Copy, Debug)]
pub struct PlanRequest {
    pub goal: FitnessGoal,
    pub days_per_week: u8,
    pub session_duration: u32,
    pub has_gym: bool,
    pub has_home: bool,
}

/// Profile edit; `None` leaves a field unchanged
#[derive(Clone, Debug, Default)]
pub struct GoalsUpdate {
    pub name: Option<String>,
    pub daily_calorie_goal: Option<u32>,
    pub daily_step_goal: Option<u32>,
    pub daily_water_goal: Option<u32>,
    pub weekly_workout_goal: Option<u32>,
    pub weekly_minutes_goal: Option<u32>,
    pub daily_calorie_burn_goal: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}
