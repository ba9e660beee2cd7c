//! Weekly workout plan generation.
//!
//! Rest days follow fixed thresholds on the requested frequency. Each
//! remaining weekday gets a focus from its index, and exercises are drawn
//! from per-category pools shuffled once per plan.

use crate::estimate::{calories_for_met, DEFAULT_WEIGHT_KG};
use crate::{
    Catalog, DayPlan, Error, Exercise, ExerciseCategory, FitnessGoal, Focus, Intensity,
    PlanRequest, PlannedExercise, PlannedWorkout, Result, ScheduledDay, WorkoutPlan,
};
use chrono::{NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;

/// Monday through Sunday, the order every schedule is laid out in
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Share of training time per category a goal aims for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusWeights {
    pub cardio: f64,
    pub strength: f64,
    pub flexibility: f64,
}

impl FitnessGoal {
    pub fn default_intensity(&self) -> Intensity {
        match self {
            FitnessGoal::LoseWeight | FitnessGoal::BuildMuscle => Intensity::High,
            FitnessGoal::ImproveEndurance | FitnessGoal::General => Intensity::Medium,
        }
    }

    pub fn focus_weights(&self) -> FocusWeights {
        let (cardio, strength, flexibility) = match self {
            FitnessGoal::LoseWeight => (0.6, 0.3, 0.1),
            FitnessGoal::BuildMuscle => (0.2, 0.7, 0.1),
            FitnessGoal::ImproveEndurance => (0.7, 0.2, 0.1),
            FitnessGoal::General => (0.4, 0.4, 0.2),
        };
        FocusWeights {
            cardio,
            strength,
            flexibility,
        }
    }
}

impl PlanRequest {
    pub fn validate(&self) -> Result<()> {
        if !(1..=7).contains(&self.days_per_week) {
            return Err(Error::validation(format!(
                "days per week must be between 1 and 7, got {}",
                self.days_per_week
            )));
        }
        if self.session_duration == 0 {
            return Err(Error::validation("session duration must be positive"));
        }
        Ok(())
    }
}

/// Weekdays left free for a given frequency
///
/// Only four patterns exist: at most five days rests the weekend, at most
/// four adds Wednesday, at most three adds Friday.
pub fn rest_days(days_per_week: u8) -> Vec<Weekday> {
    let mut rest = Vec::new();
    if days_per_week <= 5 {
        rest.extend([Weekday::Sat, Weekday::Sun]);
    }
    if days_per_week <= 4 {
        rest.push(Weekday::Wed);
    }
    if days_per_week <= 3 {
        rest.push(Weekday::Fri);
    }
    rest
}

/// Focus for the weekday at `index` (Monday = 0)
pub fn day_focus(goal: FitnessGoal, index: usize) -> Focus {
    let base = match index % 3 {
        0 => Focus::Cardio,
        1 => Focus::Strength,
        _ => Focus::Mixed,
    };
    match goal {
        FitnessGoal::LoseWeight if index % 2 == 0 => Focus::Cardio,
        FitnessGoal::BuildMuscle if index % 2 == 0 => Focus::Strength,
        _ => base,
    }
}

/// (count, time fraction) for cardio, strength and flexibility slots
fn allocation(focus: Focus) -> [(ExerciseCategory, usize, f64); 3] {
    use ExerciseCategory::{Cardio, Flexibility, Strength};
    match focus {
        Focus::Cardio => [(Cardio, 2, 0.7), (Strength, 1, 0.2), (Flexibility, 1, 0.1)],
        Focus::Strength => [(Cardio, 1, 0.2), (Strength, 3, 0.7), (Flexibility, 1, 0.1)],
        Focus::Mixed => [(Cardio, 1, 0.4), (Strength, 2, 0.4), (Flexibility, 1, 0.2)],
    }
}

/// Shuffled exercise lists, one per category a plan draws from
struct Pools<'a> {
    cardio: Vec<&'a Exercise>,
    strength: Vec<&'a Exercise>,
    flexibility: Vec<&'a Exercise>,
}

impl<'a> Pools<'a> {
    fn shuffled<R: Rng + ?Sized>(catalog: &'a Catalog, rng: &mut R) -> Self {
        let mut pools = Self {
            cardio: catalog.exercises_in(ExerciseCategory::Cardio),
            strength: catalog.exercises_in(ExerciseCategory::Strength),
            flexibility: catalog.exercises_in(ExerciseCategory::Flexibility),
        };
        pools.cardio.shuffle(rng);
        pools.strength.shuffle(rng);
        pools.flexibility.shuffle(rng);
        pools
    }

    fn get(&self, category: ExerciseCategory) -> &[&'a Exercise] {
        match category {
            ExerciseCategory::Cardio => self.cardio.as_slice(),
            ExerciseCategory::Strength => self.strength.as_slice(),
            ExerciseCategory::Flexibility => self.flexibility.as_slice(),
            ExerciseCategory::Sports | ExerciseCategory::Other => &[],
        }
    }
}

fn build_workout(focus: Focus, duration: u32, intensity: Intensity, pools: &Pools) -> PlannedWorkout {
    let mut exercises = Vec::new();
    for (category, count, fraction) in allocation(focus) {
        let minutes = (f64::from(duration) * fraction / count as f64).round() as u32;
        exercises.extend(pools.get(category).iter().take(count).map(|e| PlannedExercise {
            name: e.name.clone(),
            duration: minutes,
            category,
        }));
    }
    PlannedWorkout {
        focus,
        duration,
        intensity,
        exercises,
    }
}

/// Generate a full Monday-to-Sunday plan
///
/// The equipment flags are carried onto the plan but do not restrict which
/// exercises are picked. Every workout day of one plan draws from the same
/// shuffled pools, so the picks repeat across the week.
pub fn generate_plan<R: Rng + ?Sized>(
    catalog: &Catalog,
    request: &PlanRequest,
    today: NaiveDate,
    rng: &mut R,
) -> Result<WorkoutPlan> {
    request.validate()?;

    let intensity = request.goal.default_intensity();
    let weights = request.goal.focus_weights();
    tracing::debug!(
        "Generating {:?} plan: {} days, {} min, weights {:?}",
        request.goal,
        request.days_per_week,
        request.session_duration,
        weights
    );

    let pools = Pools::shuffled(catalog, rng);
    let rest = rest_days(request.days_per_week);

    let schedule = WEEK
        .iter()
        .enumerate()
        .map(|(index, &weekday)| {
            let plan = if rest.contains(&weekday) {
                DayPlan::Rest
            } else {
                let focus = day_focus(request.goal, index);
                DayPlan::Workout(build_workout(
                    focus,
                    request.session_duration,
                    intensity,
                    &pools,
                ))
            };
            ScheduledDay { weekday, plan }
        })
        .collect();

    Ok(WorkoutPlan {
        goal: request.goal,
        days: request.days_per_week,
        duration: request.session_duration,
        created_at: today,
        has_gym: request.has_gym,
        has_home: request.has_home,
        schedule,
    })
}

/// Calories for one planned session
///
/// Base MET 3/5/7 by intensity, +1 for a cardio focus and +0.5 for strength.
pub fn estimate_plan_calories(workout: &PlannedWorkout, weight_kg: Option<f64>) -> u32 {
    let base = match workout.intensity {
        Intensity::Low => 3.0,
        Intensity::Medium => 5.0,
        Intensity::High => 7.0,
    };
    let bonus = match workout.focus {
        Focus::Cardio => 1.0,
        Focus::Strength => 0.5,
        Focus::Mixed => 0.0,
    };
    let weight = weight_kg
        .filter(|w| *w > 0.0 && w.is_finite())
        .unwrap_or(DEFAULT_WEIGHT_KG);
    calories_for_met(base + bonus, workout.duration, weight)
}
