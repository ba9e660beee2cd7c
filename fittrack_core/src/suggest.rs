//! Meal and workout suggestions.
//!
//! Food suggestions rank catalog foods against the calories left for the day
//! and whichever macro is furthest behind. Workout suggestions filter the
//! exercise catalog by body part.

use crate::aggregate::MacroTotals;
use crate::estimate::{calories_for_met, DEFAULT_WEIGHT_KG};
use crate::{Catalog, ExerciseCategory, FoodItem};
use serde::Serialize;

/// Maximum number of foods returned
pub const MAX_FOOD_SUGGESTIONS: usize = 4;

/// Below this many band matches the filter is relaxed
const MIN_BAND_MATCHES: usize = 3;

/// Maximum number of exercises returned
pub const MAX_WORKOUT_SUGGESTIONS: usize = 6;

/// Body-part filter value that matches every exercise
pub const ALL_BODY_PARTS: &str = "all";

/// The macro the day is shortest on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroNeed {
    Protein,
    Carbs,
    Fat,
    Balanced,
}

impl MacroNeed {
    /// First unmet threshold in priority order: protein < 15%, carbs < 40%,
    /// fat < 20%. A day with no grams logged is balanced.
    pub fn from_totals(totals: &MacroTotals) -> Self {
        let total = totals.total_grams();
        if total <= 0.0 {
            return MacroNeed::Balanced;
        }
        let pct = |grams: f64| grams / total * 100.0;
        if pct(totals.protein) < 15.0 {
            MacroNeed::Protein
        } else if pct(totals.carbs) < 40.0 {
            MacroNeed::Carbs
        } else if pct(totals.fat) < 20.0 {
            MacroNeed::Fat
        } else {
            MacroNeed::Balanced
        }
    }

    fn satisfied_by(&self, food: &FoodItem) -> bool {
        match self {
            MacroNeed::Protein => food.protein >= 10.0,
            MacroNeed::Carbs => food.carbs >= 20.0,
            MacroNeed::Fat => food.fat >= 8.0,
            MacroNeed::Balanced => true,
        }
    }

    /// Grams of the needed macro per calorie; `None` when balanced
    fn density(&self, food: &FoodItem) -> Option<f64> {
        let grams = match self {
            MacroNeed::Protein => food.protein,
            MacroNeed::Carbs => food.carbs,
            MacroNeed::Fat => food.fat,
            MacroNeed::Balanced => return None,
        };
        if food.calories == 0 {
            Some(0.0)
        } else {
            Some(grams / f64::from(food.calories))
        }
    }
}

/// Outcome of a food suggestion request
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FoodSuggestions {
    /// Nothing left to eat today
    GoalReached,
    /// Calories remain but no food fits
    Unavailable { remaining: i64 },
    Foods {
        need: MacroNeed,
        remaining: i64,
        foods: Vec<FoodItem>,
    },
}

impl FoodSuggestions {
    pub fn foods(&self) -> &[FoodItem] {
        match self {
            FoodSuggestions::Foods { foods, .. } => foods.as_slice(),
            _ => &[],
        }
    }
}

/// Rank catalog foods for the calories still available today
pub fn suggest_foods(catalog: &Catalog, remaining: i64, totals: &MacroTotals) -> FoodSuggestions {
    if remaining <= 0 {
        return FoodSuggestions::GoalReached;
    }

    let need = MacroNeed::from_totals(totals);
    let budget = remaining as f64;
    let (low, high) = (budget * 0.25, budget * 0.75);

    let mut picks: Vec<&FoodItem> = catalog
        .foods
        .iter()
        .filter(|f| {
            let cal = f64::from(f.calories);
            cal >= low && cal <= high && need.satisfied_by(f)
        })
        .collect();

    if picks.len() < MIN_BAND_MATCHES {
        tracing::debug!(
            "Only {} foods in band for {:?}, relaxing to 80% of {} remaining",
            picks.len(),
            need,
            remaining
        );
        picks = catalog
            .foods
            .iter()
            .filter(|f| f64::from(f.calories) <= budget * 0.8)
            .collect();
    }

    // Stable sort keeps catalog order among equal densities.
    picks.sort_by(|a, b| match (need.density(a), need.density(b)) {
        (Some(da), Some(db)) => db.total_cmp(&da),
        _ => std::cmp::Ordering::Equal,
    });

    let foods: Vec<FoodItem> = picks
        .into_iter()
        .take(MAX_FOOD_SUGGESTIONS)
        .cloned()
        .collect();

    if foods.is_empty() {
        FoodSuggestions::Unavailable { remaining }
    } else {
        FoodSuggestions::Foods {
            need,
            remaining,
            foods,
        }
    }
}

/// An exercise preview with a reference calorie figure
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseSuggestion {
    pub name: String,
    pub category: ExerciseCategory,
    pub body_parts: Vec<String>,
    /// Average MET at 70 kg for half an hour, independent of the profile
    pub calories_per_30_min: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuggestionGroup {
    pub category: ExerciseCategory,
    pub exercises: Vec<ExerciseSuggestion>,
}

/// Exercises targeting `body_part` (or every exercise for `"all"`)
///
/// Sorted by category name, capped at six, then grouped by category.
pub fn suggest_workouts(catalog: &Catalog, body_part: &str) -> Vec<SuggestionGroup> {
    let body_part = body_part.trim();
    let match_all = body_part.eq_ignore_ascii_case(ALL_BODY_PARTS);

    let mut matches: Vec<ExerciseSuggestion> = catalog
        .exercises
        .iter()
        .flat_map(|group| group.exercises.iter().map(move |e| (group.category, e)))
        .filter(|(_, e)| match_all || e.targets(body_part))
        .map(|(category, e)| ExerciseSuggestion {
            name: e.name.clone(),
            category,
            body_parts: e.body_parts.clone(),
            calories_per_30_min: calories_for_met(e.average_met(), 30, DEFAULT_WEIGHT_KG),
        })
        .collect();

    matches.sort_by(|a, b| a.category.name().cmp(b.category.name()));
    matches.truncate(MAX_WORKOUT_SUGGESTIONS);

    let mut groups: Vec<SuggestionGroup> = Vec::new();
    for exercise in matches {
        match groups.last_mut() {
            Some(group) if group.category == exercise.category => group.exercises.push(exercise),
            _ => groups.push(SuggestionGroup {
                category: exercise.category,
                exercises: vec![exercise],
            }),
        }
    }
    groups
}
